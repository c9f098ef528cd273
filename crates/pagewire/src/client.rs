//! HTTP client wrapper with before/after hooks

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Builds the `reqwest::Client` behind every [`ApiClient`]
pub type ClientFactory = Rc<dyn Fn() -> reqwest::Client>;

type Hook = Rc<dyn Fn()>;

pub fn default_client_factory() -> ClientFactory {
    Rc::new(reqwest::Client::new)
}

/// Runs the after hooks when dropped, so they fire even if the request
/// future is abandoned or errors
struct AfterGuard<'a>(&'a [Hook]);

impl Drop for AfterGuard<'_> {
    fn drop(&mut self) {
        for hook in self.0 {
            hook();
        }
    }
}

/// A `reqwest::Client` that runs hooks around each call
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    before: Vec<Hook>,
    after: Vec<Hook>,
}

impl ApiClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Runs before every call
    pub fn before(mut self, hook: impl Fn() + 'static) -> Self {
        self.before.push(Rc::new(hook));
        self
    }

    /// Runs after every call, whatever its outcome
    pub fn after(mut self, hook: impl Fn() + 'static) -> Self {
        self.after.push(Rc::new(hook));
        self
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Runs one request built by `request` between the hooks
    pub async fn call<F, Fut, T>(&self, request: F) -> T
    where
        F: FnOnce(reqwest::Client) -> Fut,
        Fut: Future<Output = T>,
    {
        for hook in &self.before {
            hook();
        }
        let _after = AfterGuard(&self.after);
        request(self.client.clone()).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, reqwest::Error> {
        debug!(%url, "GET");
        self.call(|client| async move {
            client.get(url).send().await?.error_for_status()?.json().await
        })
        .await
    }

    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, reqwest::Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(%url, "POST");
        self.call(|client| async move {
            client
                .post(url)
                .json(body)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await
        })
        .await
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[test]
    fn test_hooks_wrap_the_call() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (b, a, c) = (log.clone(), log.clone(), log.clone());
        let client = ApiClient::new(reqwest::Client::new())
            .before(move || b.borrow_mut().push("before"))
            .after(move || a.borrow_mut().push("after"));

        let value = block_on(client.call(|_| async move {
            c.borrow_mut().push("request");
            7
        }));

        assert_eq!(value, 7);
        assert_eq!(*log.borrow(), vec!["before", "request", "after"]);
    }

    #[test]
    fn test_after_runs_when_call_is_dropped() {
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let client = ApiClient::new(reqwest::Client::new()).after(move || *c.borrow_mut() += 1);

        let pending = client.call(|_| futures::future::pending::<()>());
        let mut pending = Box::pin(pending);
        let waker = futures::task::noop_waker();
        let mut cx = std::task::Context::from_waker(&waker);
        assert!(pending.as_mut().poll(&mut cx).is_pending());
        drop(pending);

        assert_eq!(*count.borrow(), 1);
    }
}
