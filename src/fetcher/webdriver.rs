use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use tracing::debug;

use super::locators::Locator;
use super::session::{Browser, PageSession};
use crate::error::FetchError;
use crate::settings::Settings;

/// W3C element reference key.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Starts Chrome sessions on a WebDriver endpoint (chromedriver, selenium).
pub struct WebDriverBrowser {
    client: Client,
    base_url: String,
    capabilities: Value,
}

impl WebDriverBrowser {
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let page_load = Duration::from_millis(settings.page_load_timeout_ms);
        let client = Client::builder()
            // the driver itself enforces the page-load timeout; leave room for it
            .timeout(page_load + Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.webdriver_url.trim_end_matches('/').to_string(),
            capabilities: chrome_capabilities(settings),
        })
    }
}

fn chrome_capabilities(settings: &Settings) -> Value {
    let mut args = vec![
        "--disable-gpu".to_string(),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-extensions".to_string(),
        "--blink-settings=imagesEnabled=false".to_string(),
        "--dns-prefetch-disable".to_string(),
        format!("--user-agent={}", settings.user_agent),
    ];
    if settings.headless {
        args.insert(0, "--headless".to_string());
    }

    json!({
        "browserName": "chrome",
        "pageLoadStrategy": "eager",
        "timeouts": { "pageLoad": settings.page_load_timeout_ms },
        "goog:chromeOptions": {
            "args": args,
            "excludeSwitches": ["enable-automation"],
            "useAutomationExtension": false,
        },
    })
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn open(&self) -> Result<Box<dyn PageSession>, FetchError> {
        let body = json!({ "capabilities": { "alwaysMatch": self.capabilities } });
        let value = command(
            &self.client,
            Method::POST,
            &format!("{}/session", self.base_url),
            Some(body),
        )
        .await
        .map_err(|e| FetchError::SessionUnavailable(e.to_string()))?;

        let id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| FetchError::Protocol(format!("no sessionId in {value}")))?;
        debug!("Opened webdriver session {}", id);

        Ok(Box::new(WebDriverSession {
            client: self.client.clone(),
            session_url: format!("{}/session/{}", self.base_url, id),
            closed: false,
        }))
    }
}

/// One remote browser. Deleted on `close`, or on drop as a fallback.
pub struct WebDriverSession {
    client: Client,
    session_url: String,
    closed: bool,
}

#[async_trait]
impl PageSession for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<(), FetchError> {
        command(
            &self.client,
            Method::POST,
            &format!("{}/url", self.session_url),
            Some(json!({ "url": url })),
        )
        .await?;
        Ok(())
    }

    async fn element_text(&mut self, locator: &Locator) -> Result<Option<String>, FetchError> {
        let (using, value) = locator.to_webdriver();
        let found = command(
            &self.client,
            Method::POST,
            &format!("{}/element", self.session_url),
            Some(json!({ "using": using, "value": value })),
        )
        .await;

        let element = match found {
            Ok(element) => element,
            Err(FetchError::WebDriver { code, .. }) if code == "no such element" => return Ok(None),
            Err(e) => return Err(e),
        };
        let element_id = element
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| FetchError::Protocol(format!("no element reference in {element}")))?;

        let text = command(
            &self.client,
            Method::GET,
            &format!("{}/element/{}/text", self.session_url, element_id),
            None,
        )
        .await?;
        Ok(Some(text.as_str().unwrap_or_default().to_string()))
    }

    async fn page_text(&mut self) -> Result<String, FetchError> {
        let value = command(
            &self.client,
            Method::POST,
            &format!("{}/execute/sync", self.session_url),
            Some(json!({ "script": "return document.body.innerText;", "args": [] })),
        )
        .await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| FetchError::Protocol(format!("page text was not a string: {value}")))
    }

    async fn close(&mut self) -> Result<(), FetchError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        command(&self.client, Method::DELETE, &self.session_url, None).await?;
        debug!("Closed webdriver session {}", self.session_url);
        Ok(())
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        // Task was cancelled or panicked before close; release the browser anyway.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let client = self.client.clone();
            let url = self.session_url.clone();
            handle.spawn(async move {
                let _ = client.delete(url).send().await;
            });
        }
    }
}

/// Send one WebDriver command and unwrap its `value`.
async fn command(
    client: &Client,
    method: Method,
    url: &str,
    body: Option<Value>,
) -> Result<Value, FetchError> {
    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.send().await?;
    let status = response.status();
    let payload: Value = response.json().await?;
    let value = payload.get("value").cloned().unwrap_or(Value::Null);

    if !status.is_success() || value.get("error").is_some_and(Value::is_string) {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let code = field("error");
        return Err(FetchError::WebDriver {
            code: if code.is_empty() { format!("http {}", status.as_u16()) } else { code },
            message: field("message"),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server, ServerGuard};

    use super::*;
    use crate::fetcher::testing::quick_options;
    use crate::fetcher::{Document, Fetcher};

    const SESSION: &str = "/session/abc123";

    fn browser_for(server: &ServerGuard) -> WebDriverBrowser {
        let settings = Settings {
            webdriver_url: format!("{}/", server.url()),
            ..Settings::default()
        };
        WebDriverBrowser::new(&settings).unwrap()
    }

    async fn new_session(server: &mut ServerGuard) -> mockito::Mock {
        server
            .mock("POST", "/session")
            .match_body(Matcher::PartialJson(json!({
                "capabilities": { "alwaysMatch": { "browserName": "chrome" } }
            })))
            .with_header("content-type", "application/json")
            .with_body(r#"{"value":{"sessionId":"abc123","capabilities":{}}}"#)
            .create_async()
            .await
    }

    /// Respond to `method path` with a W3C error payload.
    async fn wd_error(
        server: &mut ServerGuard,
        method: &str,
        path: &str,
        status: usize,
        code: &str,
    ) -> mockito::Mock {
        let body = json!({ "value": { "error": code, "message": "", "stacktrace": "" } });
        server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    #[test]
    fn capabilities_follow_settings() {
        let mut settings = Settings::default();
        settings.headless = false;
        settings.page_load_timeout_ms = 9000;
        let caps = chrome_capabilities(&settings);

        assert_eq!(caps["pageLoadStrategy"], "eager");
        assert_eq!(caps["timeouts"]["pageLoad"], 9000);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a == "--headless"));
        assert!(args.iter().any(|a| a == "--no-sandbox"));
    }

    #[test]
    fn headless_flag_leads_args() {
        let caps = chrome_capabilities(&Settings::default());
        assert_eq!(caps["goog:chromeOptions"]["args"][0], "--headless");
    }

    #[tokio::test]
    async fn session_lifecycle_against_driver() {
        let mut server = Server::new_async().await;
        let open = new_session(&mut server).await;
        let navigate = wd_error(&mut server, "POST", &format!("{SESSION}/url"), 500, "timeout").await;
        let find = wd_error(&mut server, "POST", &format!("{SESSION}/element"), 404, "no such element").await;
        let script = server
            .mock("POST", format!("{SESSION}/execute/sync").as_str())
            .match_body(Matcher::PartialJson(json!({ "args": [] })))
            .with_body(r#"{"value":"Whole page text"}"#)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", SESSION)
            .with_body(r#"{"value":null}"#)
            .expect(1)
            .create_async()
            .await;

        let mut session = browser_for(&server).open().await.unwrap();

        let err = session.navigate("https://jobs.example.com/1").await.unwrap_err();
        assert!(matches!(&err, FetchError::WebDriver { code, .. } if code == "timeout"));
        assert!(!err.is_locator_miss());

        let found = session.element_text(&Locator::css("h1.job-title")).await.unwrap();
        assert_eq!(found, None);

        assert_eq!(session.page_text().await.unwrap(), "Whole page text");

        session.close().await.unwrap();
        session.close().await.unwrap();
        drop(session);

        open.assert_async().await;
        navigate.assert_async().await;
        find.assert_async().await;
        script.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn element_text_follows_element_reference() {
        let mut server = Server::new_async().await;
        let _open = new_session(&mut server).await;
        let find = server
            .mock("POST", format!("{SESSION}/element").as_str())
            .match_body(Matcher::Json(json!({
                "using": "css selector",
                "value": "[id=\"jobDescriptionText\"]"
            })))
            .with_body(json!({ "value": { ELEMENT_KEY: "el-7" } }).to_string())
            .create_async()
            .await;
        let _text = server
            .mock("GET", format!("{SESSION}/element/el-7/text").as_str())
            .with_body(r#"{"value":"Backend Engineer"}"#)
            .create_async()
            .await;
        let _delete = server
            .mock("DELETE", SESSION)
            .with_body(r#"{"value":null}"#)
            .create_async()
            .await;

        let mut session = browser_for(&server).open().await.unwrap();
        let text = session
            .element_text(&Locator::id("jobDescriptionText"))
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some("Backend Engineer"));
        session.close().await.unwrap();
        find.assert_async().await;
    }

    #[tokio::test]
    async fn driver_errors_are_typed() {
        let mut server = Server::new_async().await;
        let _open = new_session(&mut server).await;
        let _script = wd_error(
            &mut server,
            "POST",
            &format!("{SESSION}/execute/sync"),
            404,
            "invalid session id",
        )
        .await;
        let _delete = server
            .mock("DELETE", SESSION)
            .with_body(r#"{"value":null}"#)
            .create_async()
            .await;

        let mut session = browser_for(&server).open().await.unwrap();
        let err = session.page_text().await.unwrap_err();
        assert!(matches!(&err, FetchError::WebDriver { code, .. } if code == "invalid session id"));
        assert!(!err.is_locator_miss());
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_reports_missing_or_refused_sessions() {
        let mut server = Server::new_async().await;
        let _open = server
            .mock("POST", "/session")
            .with_body(r#"{"value":{"capabilities":{}}}"#)
            .create_async()
            .await;
        let err = browser_for(&server).open().await.err().unwrap();
        assert!(matches!(err, FetchError::Protocol(_)));

        let mut refused = Server::new_async().await;
        let _refused = wd_error(&mut refused, "POST", "/session", 500, "session not created").await;
        let err = browser_for(&refused).open().await.err().unwrap();
        assert!(matches!(err, FetchError::SessionUnavailable(_)));
    }

    #[tokio::test]
    async fn dropped_session_is_still_deleted() {
        let mut server = Server::new_async().await;
        let _open = new_session(&mut server).await;
        let delete = server
            .mock("DELETE", SESSION)
            .with_body(r#"{"value":null}"#)
            .expect(1)
            .create_async()
            .await;

        let session = browser_for(&server).open().await.unwrap();
        drop(session);

        for _ in 0..50 {
            if delete.matched_async().await {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn fetcher_falls_back_to_page_text_over_webdriver() {
        let mut server = Server::new_async().await;
        let _open = new_session(&mut server).await;
        let _navigate = wd_error(&mut server, "POST", &format!("{SESSION}/url"), 500, "timeout").await;
        let _find =
            wd_error(&mut server, "POST", &format!("{SESSION}/element"), 404, "no such element").await;
        let _script = server
            .mock("POST", format!("{SESSION}/execute/sync").as_str())
            .with_body(r#"{"value":"  Rendered posting text  "}"#)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", SESSION)
            .with_body(r#"{"value":null}"#)
            .expect(1)
            .create_async()
            .await;

        let url = "https://www.indeed.com/viewjob?jk=1";
        let fetcher = Fetcher::new(std::sync::Arc::new(browser_for(&server)), quick_options());
        let doc = fetcher.fetch(url).await;

        assert_eq!(
            doc,
            Document {
                url: url.to_string(),
                title: None,
                body_text: Some("Rendered posting text".to_string()),
            }
        );
        delete.assert_async().await;
    }
}
