//! The HTTP client for the expense REST backend.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};

use crate::{
    Error,
    api::wire::{Credentials, ErrorBody, ExpenseResponse, LogOutRequest, NewUser, TokenPair},
    auth::AccessToken,
    dashboard::FilterState,
    expense::{Category, ExpenseId, ExpenseRecord, NewExpense},
};

const CATEGORIES_PATH: &str = "api/categories/";
const EXPENSES_PATH: &str = "api/expenses/";
const LOG_IN_PATH: &str = "api/login/";
const REGISTER_PATH: &str = "api/register/";
const LOG_OUT_PATH: &str = "logout/";

/// The backend used when no URL is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// How long to wait for the backend before giving up on a request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to the expense REST backend on behalf of the logged in user.
///
/// Cloning is cheap, clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`, e.g. "http://127.0.0.1:8000".
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidApiUrl] if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let base_url = parse_base_url(base_url)?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| Error::Network(format!("could not build HTTP client: {error}")))?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path)
            .map_err(|_| Error::InvalidApiUrl(format!("{}{path}", self.base_url)))
    }

    /// Get every category.
    pub async fn fetch_categories(&self, token: &AccessToken) -> Result<Vec<Category>, Error> {
        let url = self.endpoint(CATEGORIES_PATH)?;
        tracing::debug!("GET {url}");

        let response = self.http.get(url).bearer_auth(token.as_str()).send().await?;
        let categories = check_status(response).await?.json().await?;

        Ok(categories)
    }

    /// Get the user's expenses.
    ///
    /// `filter` is sent as the `category` and `month` query parameters. The
    /// backend may ignore them, so callers should still apply
    /// [crate::select_records] to the result.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidInput] if an expense has an amount that is not a number.
    pub async fn fetch_expenses(
        &self,
        token: &AccessToken,
        filter: &FilterState,
    ) -> Result<Vec<ExpenseRecord>, Error> {
        let url = self.endpoint(EXPENSES_PATH)?;
        let query = filter.to_query_pairs();
        tracing::debug!("GET {url} {query:?}");

        let response = self
            .http
            .get(url)
            .bearer_auth(token.as_str())
            .query(&query)
            .send()
            .await?;
        let expenses: Vec<ExpenseResponse> = check_status(response).await?.json().await?;

        expenses.into_iter().map(ExpenseRecord::try_from).collect()
    }

    /// Create an expense and return it as the backend stored it.
    pub async fn create_expense(
        &self,
        token: &AccessToken,
        new_expense: &NewExpense,
    ) -> Result<ExpenseRecord, Error> {
        let url = self.endpoint(EXPENSES_PATH)?;
        tracing::debug!("POST {url}");

        let response = self
            .http
            .post(url)
            .bearer_auth(token.as_str())
            .json(new_expense)
            .send()
            .await?;
        let expense: ExpenseResponse = check_status(response).await?.json().await?;

        ExpenseRecord::try_from(expense)
    }

    /// Delete the expense with `expense_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::DeleteMissingExpense] if the backend has no such expense.
    pub async fn delete_expense(&self, token: &AccessToken, expense_id: ExpenseId) -> Result<(), Error> {
        let url = self.endpoint(&format!("{EXPENSES_PATH}{expense_id}/"))?;
        tracing::debug!("DELETE {url}");

        let response = self.http.delete(url).bearer_auth(token.as_str()).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::DeleteMissingExpense);
        }

        check_status(response).await?;

        Ok(())
    }

    /// Exchange a username and password for a pair of bearer tokens.
    ///
    /// # Errors
    ///
    /// Returns [Error::LogInRejected] with the backend's reason if the credentials are refused.
    pub async fn log_in(&self, credentials: &Credentials) -> Result<TokenPair, Error> {
        let url = self.endpoint(LOG_IN_PATH)?;
        tracing::debug!("POST {url}");

        let response = self.http.post(url).json(credentials).send().await?;

        if !response.status().is_success() {
            let body = error_body(response).await;
            return Err(Error::LogInRejected(body.log_in_message()));
        }

        Ok(response.json().await?)
    }

    /// Create a new user account.
    ///
    /// # Errors
    ///
    /// Returns [Error::RegistrationRejected] with the first field error if the backend refuses.
    pub async fn register(&self, new_user: &NewUser) -> Result<(), Error> {
        let url = self.endpoint(REGISTER_PATH)?;
        tracing::debug!("POST {url}");

        let response = self.http.post(url).json(new_user).send().await?;

        if !response.status().is_success() {
            let body = error_body(response).await;
            return Err(Error::RegistrationRejected(body.registration_message()));
        }

        Ok(())
    }

    /// Ask the backend to invalidate `refresh_token`.
    pub async fn log_out(&self, token: &AccessToken, refresh_token: &str) -> Result<(), Error> {
        let url = self.endpoint(LOG_OUT_PATH)?;
        tracing::debug!("POST {url}");

        let response = self
            .http
            .post(url)
            .bearer_auth(token.as_str())
            .json(&LogOutRequest {
                refresh: refresh_token,
            })
            .send()
            .await?;

        check_status(response).await?;

        Ok(())
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, Error> {
    let mut url = Url::parse(base_url).map_err(|_| Error::InvalidApiUrl(base_url.to_owned()))?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(Error::InvalidApiUrl(base_url.to_owned()));
    }

    // Without a trailing slash `Url::join` would replace the last path segment.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

async fn check_status(response: Response) -> Result<Response, Error> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthorized);
    }

    let body = error_body(response).await;
    tracing::warn!("The expense API responded with {status}: {:?}", body.detail);

    Err(Error::UnexpectedStatus {
        status: status.as_u16(),
        detail: body.detail,
    })
}

async fn error_body(response: Response) -> ErrorBody {
    response.json().await.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use time::{Month, macros::date};

    use crate::{
        Error,
        api::wire::{Credentials, NewUser},
        auth::AccessToken,
        dashboard::{CategoryFilter, FilterState, MonthFilter},
        expense::NewExpense,
        test_utils::{
            FakeBackend, TEST_ACCESS_TOKEN, TEST_PASSWORD, TEST_REFRESH_TOKEN, TEST_USERNAME,
            spawn_fake_backend,
        },
        year_month::YearMonth,
    };

    use super::{ApiClient, parse_base_url};

    fn token() -> AccessToken {
        AccessToken::new(TEST_ACCESS_TOKEN)
    }

    async fn client(backend: &FakeBackend) -> ApiClient {
        ApiClient::new(&backend.url, Duration::from_secs(5)).expect("Could not create client")
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let url = parse_base_url("http://127.0.0.1:8000").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/");

        let url = parse_base_url("http://example.com/backend").unwrap();
        assert_eq!(url.join("api/expenses/").unwrap().as_str(), "http://example.com/backend/api/expenses/");
    }

    #[test]
    fn rejects_invalid_base_url() {
        for url in ["not a url", "ftp://example.com", "mailto:someone@example.com"] {
            assert_eq!(
                parse_base_url(url),
                Err(Error::InvalidApiUrl(url.to_owned())),
                "want {url} to be rejected"
            );
        }
    }

    #[tokio::test]
    async fn fetches_categories() {
        let backend = spawn_fake_backend().await;

        let categories = client(&backend).await.fetch_categories(&token()).await.unwrap();

        let names: Vec<_> = categories.iter().map(|category| category.name.as_str()).collect();
        assert_eq!(names, vec!["Food", "Transport"]);
    }

    #[tokio::test]
    async fn fetches_expenses_with_string_amounts() {
        let backend = spawn_fake_backend().await;

        let expenses = client(&backend)
            .await
            .fetch_expenses(&token(), &FilterState::default())
            .await
            .unwrap();

        assert_eq!(expenses.len(), backend.expenses().len());
        assert!(expenses.iter().any(|expense| expense.amount == 100.0));
    }

    #[tokio::test]
    async fn sends_filter_as_query() {
        let backend = spawn_fake_backend().await;
        let filter = FilterState {
            category: CategoryFilter::Category(2),
            month: MonthFilter::Month(YearMonth::new(2024, Month::January)),
        };

        client(&backend)
            .await
            .fetch_expenses(&token(), &filter)
            .await
            .unwrap();

        assert_eq!(
            backend.last_query().as_deref(),
            Some("category=2&month=2024-01")
        );
    }

    #[tokio::test]
    async fn wrong_token_is_unauthorized() {
        let backend = spawn_fake_backend().await;

        let result = client(&backend)
            .await
            .fetch_categories(&AccessToken::new("expired"))
            .await;

        assert_eq!(result, Err(Error::Unauthorized));
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        let client = ApiClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();

        let result = client.fetch_categories(&token()).await;

        assert!(matches!(result, Err(Error::Network(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn creates_and_deletes_expense() {
        let backend = spawn_fake_backend().await;
        let client = client(&backend).await;
        let count_before = backend.expenses().len();

        let created = client
            .create_expense(
                &token(),
                &NewExpense {
                    title: "Bus fare".to_owned(),
                    category: 2,
                    amount: 12.5,
                    date: date!(2024 - 01 - 08),
                    description: String::new(),
                },
            )
            .await
            .unwrap();

        assert_eq!(created.amount, 12.5);
        assert_eq!(created.category_id, Some(2));
        assert_eq!(backend.expenses().len(), count_before + 1);

        client.delete_expense(&token(), created.id).await.unwrap();

        assert_eq!(backend.expenses().len(), count_before);
    }

    #[tokio::test]
    async fn deleting_missing_expense_fails() {
        let backend = spawn_fake_backend().await;

        let result = client(&backend).await.delete_expense(&token(), 9999).await;

        assert_eq!(result, Err(Error::DeleteMissingExpense));
    }

    #[tokio::test]
    async fn rejected_create_carries_detail() {
        let backend = spawn_fake_backend().await;

        let result = client(&backend)
            .await
            .create_expense(
                &token(),
                &NewExpense {
                    title: "Mystery".to_owned(),
                    category: 9999,
                    amount: 1.0,
                    date: date!(2024 - 01 - 08),
                    description: String::new(),
                },
            )
            .await;

        assert_eq!(
            result,
            Err(Error::UnexpectedStatus {
                status: 400,
                detail: Some("Invalid category.".to_owned())
            })
        );
    }

    #[tokio::test]
    async fn log_in_returns_tokens() {
        let backend = spawn_fake_backend().await;

        let tokens = client(&backend)
            .await
            .log_in(&Credentials {
                username: TEST_USERNAME.to_owned(),
                password: TEST_PASSWORD.to_owned(),
            })
            .await
            .unwrap();

        assert_eq!(tokens.access, TEST_ACCESS_TOKEN);
        assert_eq!(tokens.refresh, TEST_REFRESH_TOKEN);
    }

    #[tokio::test]
    async fn log_in_with_wrong_password_is_rejected() {
        let backend = spawn_fake_backend().await;

        let result = client(&backend)
            .await
            .log_in(&Credentials {
                username: TEST_USERNAME.to_owned(),
                password: "wrong".to_owned(),
            })
            .await;

        assert_eq!(
            result,
            Err(Error::LogInRejected(
                "No active account found with the given credentials".to_owned()
            ))
        );
    }

    #[tokio::test]
    async fn register_existing_user_is_rejected() {
        let backend = spawn_fake_backend().await;

        let result = client(&backend)
            .await
            .register(&NewUser {
                username: TEST_USERNAME.to_owned(),
                email: "test@example.com".to_owned(),
                password: "averysecurepassword".to_owned(),
            })
            .await;

        assert_eq!(
            result,
            Err(Error::RegistrationRejected(
                "Username error: A user with that username already exists.".to_owned()
            ))
        );
    }

    #[tokio::test]
    async fn log_out_sends_refresh_token() {
        let backend = spawn_fake_backend().await;

        client(&backend)
            .await
            .log_out(&token(), TEST_REFRESH_TOKEN)
            .await
            .unwrap();

        assert_eq!(backend.logged_out_tokens(), vec![TEST_REFRESH_TOKEN.to_owned()]);
    }
}
