//! One-call-per-operation client on top of `RemoClient` and a `Transport`.

use tracing::{debug, warn};

use crate::client::RemoClient;
use crate::config::Config;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    AirConSettings, Appliance, ApplianceModelAndParam, Device, InfraredSignal, NewAppliance,
    Signal, User,
};

/// Builds, executes and parses each call in one step.
///
/// Every method issues exactly one request. Nothing is retried or cached.
#[derive(Clone)]
pub struct Remo<T: Transport = UreqTransport> {
    client: RemoClient,
    transport: T,
}

impl Remo<UreqTransport> {
    /// Client for the public API (`https://api.nature.global/1`).
    pub fn new(token: &str) -> Self {
        Self::from_config(&Config::new(token))
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_transport(RemoClient::from_config(config), UreqTransport::new())
    }
}

impl<T: Transport> Remo<T> {
    pub fn with_transport(client: RemoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &RemoClient {
        &self.client
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "sending request");
        let response = self.transport.execute(request)?;
        if response.is_success() {
            debug!(%method, %url, status = response.status, "received response");
        } else {
            warn!(%method, %url, status = response.status, "request rejected");
        }
        Ok(response)
    }

    pub fn fetch_me(&self) -> Result<User, ApiError> {
        let response = self.send(self.client.build_fetch_me())?;
        self.client.parse_fetch_me(response)
    }

    pub fn update_me(&self, nickname: &str) -> Result<User, ApiError> {
        let response = self.send(self.client.build_update_me(nickname)?)?;
        self.client.parse_update_me(response)
    }

    pub fn fetch_devices(&self) -> Result<Vec<Device>, ApiError> {
        let response = self.send(self.client.build_fetch_devices())?;
        self.client.parse_fetch_devices(response)
    }

    pub fn update_device(&self, device: &str, name: &str) -> Result<(), ApiError> {
        let response = self.send(self.client.build_update_device(device, name)?)?;
        self.client.parse_update_device(response)
    }

    pub fn delete_device(&self, device: &str) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_device(device))?;
        self.client.parse_delete_device(response)
    }

    pub fn update_temperature_offset(&self, device: &str, offset: i32) -> Result<(), ApiError> {
        let response = self.send(self.client.build_update_temperature_offset(device, offset)?)?;
        self.client.parse_update_temperature_offset(response)
    }

    pub fn update_humidity_offset(&self, device: &str, offset: i32) -> Result<(), ApiError> {
        let response = self.send(self.client.build_update_humidity_offset(device, offset)?)?;
        self.client.parse_update_humidity_offset(response)
    }

    pub fn detect_appliance(&self, message: &InfraredSignal) -> Result<Vec<ApplianceModelAndParam>, ApiError> {
        let response = self.send(self.client.build_detect_appliance(message)?)?;
        self.client.parse_detect_appliance(response)
    }

    pub fn fetch_appliances(&self) -> Result<Vec<Appliance>, ApiError> {
        let response = self.send(self.client.build_fetch_appliances())?;
        self.client.parse_fetch_appliances(response)
    }

    pub fn create_appliance(&self, input: &NewAppliance) -> Result<Appliance, ApiError> {
        let response = self.send(self.client.build_create_appliance(input)?)?;
        self.client.parse_create_appliance(response)
    }

    pub fn update_appliance(&self, appliance: &str, nickname: &str, image: &str) -> Result<Appliance, ApiError> {
        let response = self.send(self.client.build_update_appliance(appliance, nickname, image)?)?;
        self.client.parse_update_appliance(response)
    }

    pub fn delete_appliance(&self, appliance: &str) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_appliance(appliance))?;
        self.client.parse_delete_appliance(response)
    }

    pub fn reorder_appliances<S: AsRef<str>>(&self, appliances: &[S]) -> Result<(), ApiError> {
        let response = self.send(self.client.build_reorder_appliances(appliances)?)?;
        self.client.parse_reorder_appliances(response)
    }

    pub fn update_aircon_settings(&self, appliance: &str, settings: &AirConSettings) -> Result<(), ApiError> {
        let response = self.send(self.client.build_update_aircon_settings(appliance, settings)?)?;
        self.client.parse_update_aircon_settings(response)
    }

    pub fn fetch_appliance_signals(&self, appliance: &str) -> Result<Vec<Signal>, ApiError> {
        let response = self.send(self.client.build_fetch_appliance_signals(appliance))?;
        self.client.parse_fetch_appliance_signals(response)
    }

    pub fn create_appliance_signal(
        &self,
        appliance: &str,
        message: &InfraredSignal,
        image: &str,
        name: &str,
    ) -> Result<Signal, ApiError> {
        let request = self.client.build_create_appliance_signal(appliance, message, image, name)?;
        let response = self.send(request)?;
        self.client.parse_create_appliance_signal(response)
    }

    pub fn reorder_appliance_signals<S: AsRef<str>>(&self, appliance: &str, signals: &[S]) -> Result<(), ApiError> {
        let response = self.send(self.client.build_reorder_appliance_signals(appliance, signals)?)?;
        self.client.parse_reorder_appliance_signals(response)
    }

    pub fn update_signal(&self, signal: &str, image: &str, name: &str) -> Result<(), ApiError> {
        let response = self.send(self.client.build_update_signal(signal, image, name)?)?;
        self.client.parse_update_signal(response)
    }

    pub fn delete_signal(&self, signal: &str) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_signal(signal))?;
        self.client.parse_delete_signal(response)
    }

    pub fn send_signal(&self, signal: &str) -> Result<(), ApiError> {
        let response = self.send(self.client.build_send_signal(signal))?;
        self.client.parse_send_signal(response)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::http::HttpMethod;

    /// Records requests and replays canned responses in order.
    #[derive(Default)]
    struct Recorder {
        requests: RefCell<Vec<HttpRequest>>,
        responses: RefCell<VecDeque<HttpResponse>>,
    }

    impl Recorder {
        fn replying(status: u16, body: &str) -> Self {
            let recorder = Self::default();
            recorder.responses.borrow_mut().push_back(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            });
            recorder
        }
    }

    impl Transport for Recorder {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| ApiError::Transport("no canned response".to_string()))
        }
    }

    struct Unreachable;

    impl Transport for Unreachable {
        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("connection refused".to_string()))
        }
    }

    fn remo<T: Transport>(transport: T) -> Remo<T> {
        Remo::with_transport(RemoClient::new("http://remo.test/1", "t"), transport)
    }

    #[test]
    fn fetch_me_issues_exactly_one_get() {
        let recorder = Recorder::replying(200, r#"{"id":"u1","nickname":"jane"}"#);
        let user = remo(&recorder).fetch_me().unwrap();
        assert_eq!(user.id, "u1");

        let requests = recorder.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].url, "http://remo.test/1/users/me");
    }

    #[test]
    fn send_signal_posts_without_body() {
        let recorder = Recorder::replying(200, "{}");
        remo(&recorder).send_signal("sig-9").unwrap();

        let requests = recorder.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].url, "http://remo.test/1/signals/sig-9/send");
        assert!(requests[0].body.is_none());
    }

    #[test]
    fn rejected_request_surfaces_status() {
        let recorder = Recorder::replying(401, r#"{"code":401001,"message":"Unauthorized"}"#);
        let err = remo(&recorder).fetch_devices().unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(recorder.requests.borrow().len(), 1);
    }

    #[test]
    fn transport_failure_is_not_retried() {
        let err = remo(Unreachable).delete_appliance("app-1").unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn new_targets_public_api() {
        let remo = Remo::new("t");
        assert_eq!(remo.client().base_url(), "https://api.nature.global/1");
    }
}
