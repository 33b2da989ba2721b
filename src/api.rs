//! Thin typed client for the paper-trading backend API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::core::model::Account;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Outcome of a sell order. The backend reports the locked-in P/L so the
/// caller can show it without recomputing.
#[derive(Debug, Deserialize)]
pub struct SellReceipt {
    pub profit_or_loss: f64,
    #[serde(default)]
    pub budget: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AdviceResponse {
    analysis: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("papertrade/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(ApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.authed(self.client.get(self.url(path)))
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.authed(self.client.post(self.url(path)))
    }

    fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.authed(self.client.put(self.url(path)))
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Surfaces the backend's `detail` message on a non-2xx response.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.detail)
            .unwrap_or_else(|_| status.to_string());
        Err(anyhow!("Backend error ({status}): {detail}"))
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Account> {
        debug!("Registering account for {username}");
        let response = self
            .post("/register/")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .context("Failed to reach backend")?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Exchanges credentials for a bearer token. The login endpoint takes
    /// OAuth2 password-grant form fields, not JSON.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        debug!("Logging in as {username}");
        let response = self
            .client
            .post(self.url("/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .context("Failed to reach backend")?;
        let token: TokenResponse = Self::check(response).await?.json().await?;
        Ok(token.access_token)
    }

    pub async fn dashboard(&self) -> Result<Account> {
        let response = self
            .get("/dashboard/")
            .send()
            .await
            .context("Failed to reach backend")?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Buys at the supplied live price; the backend trusts the client's
    /// quote for simulated execution.
    pub async fn buy(&self, ticker: &str, quantity: u32, price: f64) -> Result<Account> {
        debug!("Buying {quantity} x {ticker} at {price}");
        let response = self
            .post("/trade/buy/")
            .json(&json!({
                "ticker": ticker,
                "quantity": quantity,
                "price": price,
            }))
            .send()
            .await
            .context("Failed to reach backend")?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn sell(&self, ticker: &str, quantity: u32, price: f64) -> Result<SellReceipt> {
        debug!("Selling {quantity} x {ticker} at {price}");
        let response = self
            .post("/trade/sell/")
            .json(&json!({
                "ticker": ticker,
                "quantity": quantity,
                "price": price,
            }))
            .send()
            .await
            .context("Failed to reach backend")?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn update_budget(&self, new_budget: f64) -> Result<Account> {
        let response = self
            .put("/users/me/budget")
            .json(&json!({ "new_budget": new_budget }))
            .send()
            .await
            .context("Failed to reach backend")?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn reset(&self) -> Result<Account> {
        let response = self
            .post("/users/me/reset")
            .send()
            .await
            .context("Failed to reach backend")?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn advice(&self) -> Result<String> {
        let response = self
            .get("/portfolio/analysis/")
            .send()
            .await
            .context("Failed to reach backend")?;
        let body: AdviceResponse = Self::check(response).await?.json().await?;
        Ok(body.analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ACCOUNT_BODY: &str = r#"{
        "username": "alice",
        "email": "alice@example.com",
        "budget": 100000.0,
        "holdings": [],
        "transactions": []
    }"#;

    #[tokio::test]
    async fn test_login_sends_form_credentials() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_string_contains("username=alice"))
            .and(body_string_contains("password=s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"access_token": "tok123", "token_type": "bearer"}"#,
            ))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri(), None).unwrap();
        let token = client.login("alice", "s3cret").await.unwrap();
        assert_eq!(token, "tok123");
    }

    #[tokio::test]
    async fn test_login_rejection_surfaces_detail() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"detail": "Incorrect username or password"}"#),
            )
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri(), None).unwrap();
        let result = client.login("alice", "wrong").await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Incorrect username or password")
        );
    }

    #[tokio::test]
    async fn test_dashboard_sends_bearer_token() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dashboard/"))
            .and(header("authorization", "Bearer tok123"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ACCOUNT_BODY))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri(), Some("tok123".to_string())).unwrap();
        let account = client.dashboard().await.unwrap();
        assert_eq!(account.username, "alice");
        assert_eq!(account.budget, 100000.0);
    }

    #[tokio::test]
    async fn test_buy_posts_trade_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/trade/buy/"))
            .and(body_string_contains(r#""ticker":"X.NSE""#))
            .and(body_string_contains(r#""quantity":5"#))
            .respond_with(ResponseTemplate::new(200).set_body_string(ACCOUNT_BODY))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri(), Some("tok".to_string())).unwrap();
        let account = client.buy("X.NSE", 5, 100.0).await.unwrap();
        assert_eq!(account.username, "alice");
    }

    #[tokio::test]
    async fn test_buy_insufficient_funds() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/trade/buy/"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string(r#"{"detail": "Insufficient funds"}"#),
            )
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri(), Some("tok".to_string())).unwrap();
        let result = client.buy("X.NSE", 5000, 100.0).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Insufficient funds"));
    }

    #[tokio::test]
    async fn test_sell_returns_receipt() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/trade/sell/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"profit_or_loss": 250.5, "budget": 101250.5}"#),
            )
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri(), Some("tok".to_string())).unwrap();
        let receipt = client.sell("X.NSE", 5, 150.0).await.unwrap();
        assert_eq!(receipt.profit_or_loss, 250.5);
        assert_eq!(receipt.budget, Some(101250.5));
    }

    #[tokio::test]
    async fn test_advice_unwraps_analysis_text() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/portfolio/analysis/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"analysis": "Diversify beyond a single sector."}"#),
            )
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri(), Some("tok".to_string())).unwrap();
        let text = client.advice().await.unwrap();
        assert_eq!(text, "Diversify beyond a single sector.");
    }
}
