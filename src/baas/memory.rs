//! In-memory `Backend` for tests.
//!
//! Mirrors the hosted backend closely enough to exercise the handlers:
//! accounts with passwords, bearer tokens, and tables of JSON rows with
//! server-assigned `id` and `created_at`.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use uuid::Uuid;

use super::query::Query;
use super::types::{Access, AuthSession, AuthUser, BaasError, Backend, Credentials, SignUpOutcome};

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, (AuthUser, String)>,
    tokens: HashMap<String, AuthUser>,
    tables: HashMap<String, Vec<Value>>,
    seq: u64,
    calls: Vec<&'static str>,
    redirects: Vec<Option<String>>,
}

#[derive(Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
    /// When set, every data operation fails with this message.
    fail_with: Mutex<Option<String>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account and return a live token for it.
    pub fn seed_user(&self, email: &str, password: &str) -> (AuthUser, String) {
        let mut inner = self.inner.lock().unwrap();
        let user = AuthUser { id: Uuid::new_v4(), email: Some(email.to_owned()) };
        inner
            .accounts
            .insert(email.to_owned(), (user.clone(), password.to_owned()));
        let token = format!("token-{}", Uuid::new_v4());
        inner.tokens.insert(token.clone(), user.clone());
        (user, token)
    }

    /// Insert a row directly, bypassing access checks.
    pub fn seed_row(&self, table: &str, row: Value) -> Value {
        let mut inner = self.inner.lock().unwrap();
        stamp_and_store(&mut inner, table, row)
    }

    pub fn fail_data_with(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_owned());
    }

    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.inner
            .lock()
            .unwrap()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Names of the operations invoked so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<&'static str> {
        self.inner.lock().unwrap().calls.clone()
    }

    #[must_use]
    pub fn signup_redirects(&self) -> Vec<Option<String>> {
        self.inner.lock().unwrap().redirects.clone()
    }

    #[must_use]
    pub fn token_is_live(&self, token: &str) -> bool {
        self.inner.lock().unwrap().tokens.contains_key(token)
    }

    fn check_access(&self, inner: &Inner, access: Access<'_>) -> Result<(), BaasError> {
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(BaasError::Api { status: 500, message });
        }
        match access {
            Access::User(token) if !inner.tokens.contains_key(token) => {
                Err(BaasError::Api { status: 401, message: "JWT expired".into() })
            }
            _ => Ok(()),
        }
    }
}

fn stamp_and_store(inner: &mut Inner, table: &str, mut row: Value) -> Value {
    inner.seq += 1;
    if let Some(obj) = row.as_object_mut() {
        obj.entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        obj.insert("created_at".into(), Value::String(format!("2026-01-01T00:00:00.{:06}+00:00", inner.seq)));
    }
    inner
        .tables
        .entry(table.to_owned())
        .or_default()
        .push(row.clone());
    row
}

fn matches(row: &Value, query: &Query) -> bool {
    query.filters().iter().all(|(column, value)| {
        row.get(column).is_some_and(|field| match field {
            Value::String(s) => s == value,
            other => other.to_string() == *value,
        })
    })
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[async_trait::async_trait]
impl Backend for MemoryBackend {
    async fn sign_up(
        &self,
        credentials: &Credentials,
        email_redirect_to: Option<&str>,
    ) -> Result<SignUpOutcome, BaasError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("sign_up");
        inner.redirects.push(email_redirect_to.map(str::to_owned));
        if inner.accounts.contains_key(&credentials.email) {
            return Err(BaasError::Api { status: 422, message: "User already registered".into() });
        }
        let user = AuthUser { id: Uuid::new_v4(), email: Some(credentials.email.clone()) };
        inner
            .accounts
            .insert(credentials.email.clone(), (user.clone(), credentials.password.clone()));
        Ok(SignUpOutcome { user: Some(user), session: None })
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, BaasError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("sign_in");
        let user = match inner.accounts.get(&credentials.email) {
            Some((user, password)) if *password == credentials.password => user.clone(),
            _ => return Err(BaasError::Api { status: 400, message: "Invalid login credentials".into() }),
        };
        let token = format!("token-{}", Uuid::new_v4());
        inner.tokens.insert(token.clone(), user.clone());
        Ok(AuthSession { access_token: token, expires_in: Some(3600), user })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BaasError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("sign_out");
        inner.tokens.remove(access_token);
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, BaasError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("get_user");
        Ok(inner.tokens.get(access_token).cloned())
    }

    async fn select(&self, access: Access<'_>, query: &Query) -> Result<Vec<Value>, BaasError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("select");
        self.check_access(&inner, access)?;
        let mut rows: Vec<Value> = inner
            .tables
            .get(query.table_name())
            .map(|rows| rows.iter().filter(|r| matches(r, query)).cloned().collect())
            .unwrap_or_default();
        if let Some(order) = query.ordering() {
            rows.sort_by(|a, b| {
                let ord = compare(a.get(&order.column), b.get(&order.column));
                if order.ascending { ord } else { ord.reverse() }
            });
        }
        Ok(rows)
    }

    async fn insert(&self, access: Access<'_>, table: &str, row: Value) -> Result<Vec<Value>, BaasError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("insert");
        self.check_access(&inner, access)?;
        Ok(vec![stamp_and_store(&mut inner, table, row)])
    }

    async fn update(&self, access: Access<'_>, query: &Query, patch: Value) -> Result<Vec<Value>, BaasError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("update");
        self.check_access(&inner, access)?;
        let mut updated = Vec::new();
        if let Some(rows) = inner.tables.get_mut(query.table_name()) {
            for row in rows.iter_mut().filter(|r| matches(r, query)) {
                if let (Some(obj), Some(fields)) = (row.as_object_mut(), patch.as_object()) {
                    for (k, v) in fields {
                        obj.insert(k.clone(), v.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, access: Access<'_>, query: &Query) -> Result<(), BaasError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("delete");
        self.check_access(&inner, access)?;
        if let Some(rows) = inner.tables.get_mut(query.table_name()) {
            rows.retain(|r| !matches(r, query));
        }
        Ok(())
    }
}
