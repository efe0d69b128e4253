use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{Credentials, Flashcard, FlashcardStore, Identity, IdentityProvider, SessionToken};
use crate::config::AppConfig;
use crate::error::AppError;

const OWNER_FIELD: &str = "uid";
const FRONT_FIELD: &str = "front";
const BACK_FIELD: &str = "back";
const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

/// Firebase Auth (password sign-in) and Cloud Firestore over their REST APIs.
pub struct FirebaseGateway {
    client: Client,
    api_key: String,
    project_id: String,
    auth_endpoint: String,
    token_endpoint: String,
    store_endpoint: String,
    collection: String,
    /// Latest token per owner; replaces the one issued at sign-in once renewed.
    sessions: Mutex<HashMap<String, SessionToken>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    grant_type: &'a str,
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<Document>,
}

#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    name: String,
    #[serde(default)]
    fields: HashMap<String, Value>,
}

impl FirebaseGateway {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::Config("firebase backend needs an api key".into()))?;
        let project_id = config
            .project_id
            .clone()
            .ok_or_else(|| AppError::Config("firebase backend needs a project id".into()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(FirebaseGateway {
            client,
            api_key,
            project_id,
            auth_endpoint: config.auth_endpoint.trim_end_matches('/').to_string(),
            token_endpoint: config.token_endpoint.trim_end_matches('/').to_string(),
            store_endpoint: config.store_endpoint.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            sessions: Mutex::new(HashMap::new()),
        })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents",
            self.store_endpoint, self.project_id
        )
    }

    fn sign_in_request(&self, credentials: &Credentials) -> RequestBuilder {
        self.client
            .post(format!("{}/v1/accounts:signInWithPassword", self.auth_endpoint))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&SignInRequest {
                email: credentials.email.trim(),
                password: &credentials.password,
                return_secure_token: true,
            })
    }

    fn refresh_request(&self, refresh_token: &str) -> RequestBuilder {
        self.client
            .post(format!("{}/v1/token", self.token_endpoint))
            .header(API_KEY_HEADER, &self.api_key)
            .form(&RefreshRequest {
                grant_type: "refresh_token",
                refresh_token,
            })
    }

    fn sessions(&self) -> Result<MutexGuard<'_, HashMap<String, SessionToken>>, AppError> {
        self.sessions
            .lock()
            .map_err(|_| AppError::Store("token cache lock poisoned".into()))
    }

    fn remember(&self, owner_id: &str, token: SessionToken) -> Result<(), AppError> {
        self.sessions()?.insert(owner_id.to_string(), token);
        Ok(())
    }

    /// Current bearer token for `identity`, renewed first when it is about to lapse.
    fn bearer_token(&self, identity: &Identity) -> Result<Option<String>, AppError> {
        let Some(issued) = &identity.token else {
            return Ok(None);
        };
        let mut sessions = self.sessions()?;
        let session = sessions
            .entry(identity.owner_id.clone())
            .or_insert_with(|| issued.clone());
        if session.needs_refresh(SystemTime::now()) {
            tracing::debug!(owner = %identity.owner_id, "renewing id token");
            let response = self.refresh_request(&session.refresh_token).send()?;
            let status = response.status();
            let body = response.text()?;
            let renewed = session_from_refresh(status, &body, SystemTime::now())?;
            *session = renewed;
        }
        Ok(Some(session.id_token.clone()))
    }

    fn authorized(
        &self,
        request: RequestBuilder,
        identity: &Identity,
    ) -> Result<RequestBuilder, AppError> {
        Ok(match self.bearer_token(identity)? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => format!("{status}: {}", envelope.error.message),
        Err(_) => status.to_string(),
    }
}

fn token_lifetime(expires_in: Option<&str>) -> Duration {
    let secs = expires_in
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
    Duration::from_secs(secs)
}

fn identity_from_response(
    status: StatusCode,
    body: &str,
    now: SystemTime,
) -> Result<Identity, AppError> {
    if !status.is_success() {
        return Err(AppError::Auth(error_message(status, body)));
    }
    let body: SignInResponse =
        serde_json::from_str(body).map_err(|err| AppError::Auth(err.to_string()))?;
    let expires_at = now + token_lifetime(body.expires_in.as_deref());
    Ok(Identity {
        owner_id: body.local_id,
        display_name: body.display_name.filter(|name| !name.is_empty()).or(body.email),
        token: Some(SessionToken {
            id_token: body.id_token,
            refresh_token: body.refresh_token,
            expires_at,
        }),
    })
}

fn session_from_refresh(
    status: StatusCode,
    body: &str,
    now: SystemTime,
) -> Result<SessionToken, AppError> {
    if !status.is_success() {
        return Err(AppError::SessionExpired(error_message(status, body)));
    }
    let body: RefreshResponse =
        serde_json::from_str(body).map_err(|err| AppError::SessionExpired(err.to_string()))?;
    let expires_at = now + token_lifetime(body.expires_in.as_deref());
    Ok(SessionToken {
        id_token: body.id_token,
        refresh_token: body.refresh_token,
        expires_at,
    })
}

/// A rejected bearer token ends the session; anything else is a store failure.
fn store_error(status: StatusCode, body: &str) -> AppError {
    if status == StatusCode::UNAUTHORIZED {
        AppError::SessionExpired(error_message(status, body))
    } else {
        AppError::Store(error_message(status, body))
    }
}

impl IdentityProvider for FirebaseGateway {
    fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AppError> {
        let response = self
            .sign_in_request(credentials)
            .send()
            .map_err(|err| AppError::Auth(err.without_url().to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|err| AppError::Auth(err.without_url().to_string()))?;
        let identity = identity_from_response(status, &body, SystemTime::now())?;
        if let Some(token) = &identity.token {
            self.remember(&identity.owner_id, token.clone())?;
        }
        Ok(identity)
    }

    fn sign_out(&self, identity: &Identity) -> Result<(), AppError> {
        self.sessions()?.remove(&identity.owner_id);
        Ok(())
    }
}

impl FlashcardStore for FirebaseGateway {
    fn list_cards_for_owner(&self, identity: &Identity) -> Result<Vec<Flashcard>, AppError> {
        let url = format!("{}:runQuery", self.documents_url());
        let request = self
            .client
            .post(url)
            .json(&owner_query(&self.collection, &identity.owner_id));
        let response = self.authorized(request, identity)?.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(store_error(status, &response.text()?));
        }
        let items: Vec<RunQueryItem> = response.json()?;
        Ok(collect_cards(items))
    }

    fn insert_card(&self, identity: &Identity, card: &Flashcard) -> Result<(), AppError> {
        let url = format!("{}/{}", self.documents_url(), self.collection);
        let request = self.client.post(url).json(&encode_document(card));
        let response = self.authorized(request, identity)?.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(store_error(status, &response.text()?));
        }
        Ok(())
    }
}

fn owner_query(collection: &str, owner_id: &str) -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": "uid" },
                    "op": "EQUAL",
                    "value": { "stringValue": owner_id }
                }
            }
        }
    })
}

fn encode_document(card: &Flashcard) -> Value {
    json!({
        "fields": {
            "uid": { "stringValue": card.owner },
            "front": { "stringValue": card.front },
            "back": { "stringValue": card.back }
        }
    })
}

fn string_field(fields: &HashMap<String, Value>, key: &'static str) -> Result<String, AppError> {
    fields
        .get(key)
        .and_then(|value| value.get("stringValue"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::Store(format!("document field '{key}' is missing or not a string")))
}

fn decode_document(document: &Document) -> Result<Flashcard, AppError> {
    Ok(Flashcard {
        owner: string_field(&document.fields, OWNER_FIELD)?,
        front: string_field(&document.fields, FRONT_FIELD)?,
        back: string_field(&document.fields, BACK_FIELD)?,
    })
}

fn collect_cards(items: Vec<RunQueryItem>) -> Vec<Flashcard> {
    items
        .into_iter()
        .filter_map(|item| item.document)
        .filter_map(|document| match decode_document(&document) {
            Ok(card) => Some(card),
            Err(err) => {
                tracing::warn!(document = %document.name, error = %err, "skipping malformed flashcard");
                None
            }
        })
        .collect()
}
