use poem_openapi::Tags;

#[derive(Debug, Tags)]
pub enum ApiTags {
    Admin,
    App,
    Auth,
    Health,
}
