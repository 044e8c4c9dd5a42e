use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use jsonwebtoken::{Algorithm, DecodingKey, Header, Validation, decode, decode_header};
use once_cell::sync::Lazy;
use poem::Request;
use poem_openapi::SecurityScheme;
use serde::Deserialize;

const GOOGLE_CERTS_URL: &str =
    "https://www.googleapis.com/robot/v1/metadata/x509/securetoken@system.gserviceaccount.com";
const CACHE_TTL: Duration = Duration::from_secs(3600);

/// Firebase project whose ID tokens the admin interface accepts.
/// Attached to the admin endpoint as request data.
#[derive(Debug, Clone)]
pub struct TokenAudience(pub String);

/// Caller identified by a verified Firebase ID token.
#[derive(Debug, Clone)]
pub struct Principal {
    pub uid: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct FirebaseClaims {
    sub: String,
    email: Option<String>,
    iss: String,
    aud: String,
    exp: u64,
    iat: u64,
}

struct CachedCerts {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
}

static CERTS_CACHE: Lazy<RwLock<Option<CachedCerts>>> = Lazy::new(|| RwLock::new(None));

async fn fetch_google_certs() -> Result<HashMap<String, DecodingKey>, String> {
    let response: HashMap<String, String> = reqwest::get(GOOGLE_CERTS_URL)
        .await
        .map_err(|e| format!("auth.certs_fetch_failed: {e}"))?
        .json()
        .await
        .map_err(|e| format!("auth.certs_parse_failed: {e}"))?;

    let mut keys = HashMap::new();
    for (kid, pem) in response {
        let key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| format!("auth.cert_decode_failed: {e}"))?;
        keys.insert(kid, key);
    }

    Ok(keys)
}

async fn refresh_certs_if_stale() -> Result<(), String> {
    {
        let cache = CERTS_CACHE
            .read()
            .map_err(|e| format!("auth.cache_read_failed: {e}"))?;
        if let Some(cached) = cache.as_ref()
            && cached.fetched_at.elapsed() < CACHE_TTL
        {
            return Ok(());
        }
    }

    let keys = fetch_google_certs().await?;

    let mut cache = CERTS_CACHE
        .write()
        .map_err(|e| format!("auth.cache_write_failed: {e}"))?;
    *cache = Some(CachedCerts {
        keys,
        fetched_at: Instant::now(),
    });

    Ok(())
}

fn verify_token(token: &str, project_id: &str) -> Result<String, String> {
    let header: Header =
        decode_header(token).map_err(|e| format!("auth.invalid_token_header: {e}"))?;

    let kid = header.kid.ok_or("auth.missing_kid")?;

    // Certificates must already be cached by `refresh_certs_if_stale`.
    let cache = CERTS_CACHE
        .read()
        .map_err(|e| format!("auth.cache_read_failed: {e}"))?;
    let cached = cache.as_ref().ok_or("auth.certs_not_loaded")?;

    let decoding_key = cached.keys.get(&kid).ok_or("auth.unknown_kid")?;

    let expected_issuer = format!("https://securetoken.google.com/{}", project_id);

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[project_id]);
    validation.set_issuer(&[&expected_issuer]);
    validation.validate_exp = true;

    let token_data = decode::<FirebaseClaims>(token, decoding_key, &validation)
        .map_err(|e| format!("auth.token_validation_failed: {e}"))?;

    Ok(token_data.claims.sub)
}

/// Firebase ID token bearer authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    bearer_format = "JWT",
    checker = "firebase_bearer_checker"
)]
pub struct FirebaseBearer(pub Principal);

async fn firebase_bearer_checker(
    req: &Request,
    bearer: poem_openapi::auth::Bearer,
) -> Option<Principal> {
    let Some(TokenAudience(project_id)) = req.data::<TokenAudience>() else {
        tracing::error!("Token audience missing from request data");
        return None;
    };

    if let Err(e) = refresh_certs_if_stale().await {
        tracing::error!("Failed to fetch Google certs: {e}");
        return None;
    }

    match verify_token(&bearer.token, project_id) {
        Ok(uid) => Some(Principal {
            uid,
            token: bearer.token,
        }),
        Err(e) => {
            tracing::warn!("Firebase auth failed: {e}");
            None
        }
    }
}
