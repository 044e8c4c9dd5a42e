pub mod application {
    pub mod auth {
        pub mod login;
    }
    pub mod health {
        pub mod check_readiness;
    }
}

pub mod domain {
    pub mod logger;
    pub mod auth {
        pub mod errors;
        pub mod model;
        pub mod services;
        pub mod value_objects;
        pub mod use_cases {
            pub mod login;
        }
    }
    pub mod health {
        pub mod model;
        pub mod services;
        pub mod use_cases {
            pub mod check_readiness;
        }
    }
}
