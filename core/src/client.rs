//! Stateless HTTP request builder and response parser for the Remo cloud API.
//!
//! # Design
//! `RemoClient` holds only a `base_url` and a bearer token and carries no
//! mutable state between calls. Each endpoint is split into a `build_*` method
//! that produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round trip, keeping
//! this module deterministic and free of I/O.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::ApiError;
use crate::form;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AirConSettings, Appliance, ApplianceModelAndParam, Device, InfraredSignal, NewAppliance,
    Signal, User,
};

/// Synchronous, stateless client for the Remo cloud API.
#[derive(Clone)]
pub struct RemoClient {
    base_url: String,
    token: String,
}

impl fmt::Debug for RemoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Everything except RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encode an id so it stays a single path segment.
fn segment(id: &str) -> String {
    utf8_percent_encode(id, PATH_SEGMENT).to_string()
}

#[derive(Serialize)]
struct Nickname<'a> {
    nickname: &'a str,
}

#[derive(Serialize)]
struct Name<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct Offset {
    offset: i32,
}

#[derive(Serialize)]
struct Message {
    message: String,
}

#[derive(Serialize)]
struct NicknameImage<'a> {
    nickname: &'a str,
    image: &'a str,
}

#[derive(Serialize)]
struct ImageName<'a> {
    image: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct NewSignal<'a> {
    message: String,
    image: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct ApplianceOrder {
    appliances: String,
}

#[derive(Serialize)]
struct SignalOrder {
    signals: String,
}

impl RemoClient {
    /// `base_url` already includes the API version, e.g.
    /// `https://api.nature.global/1`.
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_url(), &config.token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -- users --------------------------------------------------------------

    pub fn build_fetch_me(&self) -> HttpRequest {
        self.get("/users/me")
    }

    pub fn parse_fetch_me(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_json(response)
    }

    pub fn build_update_me(&self, nickname: &str) -> Result<HttpRequest, ApiError> {
        self.post_form("/users/me", &Nickname { nickname })
    }

    pub fn parse_update_me(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_json(response)
    }

    // -- devices ------------------------------------------------------------

    pub fn build_fetch_devices(&self) -> HttpRequest {
        self.get("/devices")
    }

    pub fn parse_fetch_devices(&self, response: HttpResponse) -> Result<Vec<Device>, ApiError> {
        parse_json(response)
    }

    pub fn build_update_device(&self, device: &str, name: &str) -> Result<HttpRequest, ApiError> {
        self.post_form(&format!("/devices/{}", segment(device)), &Name { name })
    }

    pub fn parse_update_device(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response)
    }

    pub fn build_delete_device(&self, device: &str) -> HttpRequest {
        self.post(&format!("/devices/{}/delete", segment(device)), None)
    }

    pub fn parse_delete_device(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response)
    }

    pub fn build_update_temperature_offset(
        &self,
        device: &str,
        offset: i32,
    ) -> Result<HttpRequest, ApiError> {
        self.post_form(&format!("/devices/{}/temperature_offset", segment(device)), &Offset { offset })
    }

    pub fn parse_update_temperature_offset(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response)
    }

    pub fn build_update_humidity_offset(
        &self,
        device: &str,
        offset: i32,
    ) -> Result<HttpRequest, ApiError> {
        self.post_form(&format!("/devices/{}/humidity_offset", segment(device)), &Offset { offset })
    }

    pub fn parse_update_humidity_offset(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response)
    }

    // -- appliances ---------------------------------------------------------

    /// Ask the service which air conditioner models recognise `message`.
    pub fn build_detect_appliance(&self, message: &InfraredSignal) -> Result<HttpRequest, ApiError> {
        let message = form::embed_json(message)?;
        self.post_form("/detectappliance", &Message { message })
    }

    pub fn parse_detect_appliance(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<ApplianceModelAndParam>, ApiError> {
        parse_json(response)
    }

    pub fn build_fetch_appliances(&self) -> HttpRequest {
        self.get("/appliances")
    }

    pub fn parse_fetch_appliances(&self, response: HttpResponse) -> Result<Vec<Appliance>, ApiError> {
        parse_json(response)
    }

    pub fn build_create_appliance(&self, input: &NewAppliance) -> Result<HttpRequest, ApiError> {
        self.post_form("/appliances", input)
    }

    pub fn parse_create_appliance(&self, response: HttpResponse) -> Result<Appliance, ApiError> {
        parse_json(response)
    }

    pub fn build_update_appliance(
        &self,
        appliance: &str,
        nickname: &str,
        image: &str,
    ) -> Result<HttpRequest, ApiError> {
        self.post_form(&format!("/appliances/{}", segment(appliance)), &NicknameImage { nickname, image })
    }

    pub fn parse_update_appliance(&self, response: HttpResponse) -> Result<Appliance, ApiError> {
        parse_json(response)
    }

    pub fn build_delete_appliance(&self, appliance: &str) -> HttpRequest {
        self.post(&format!("/appliances/{}/delete", segment(appliance)), None)
    }

    pub fn parse_delete_appliance(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response)
    }

    /// `appliances` is the complete list of appliance ids in display order.
    pub fn build_reorder_appliances<S: AsRef<str>>(
        &self,
        appliances: &[S],
    ) -> Result<HttpRequest, ApiError> {
        let appliances = form::join_list(appliances);
        self.post_form("/appliance_orders", &ApplianceOrder { appliances })
    }

    pub fn parse_reorder_appliances(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response)
    }

    pub fn build_update_aircon_settings(
        &self,
        appliance: &str,
        settings: &AirConSettings,
    ) -> Result<HttpRequest, ApiError> {
        self.post_form(&format!("/appliances/{}/aircon_settings", segment(appliance)), settings)
    }

    pub fn parse_update_aircon_settings(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response)
    }

    pub fn build_fetch_appliance_signals(&self, appliance: &str) -> HttpRequest {
        self.get(&format!("/appliances/{}/signals", segment(appliance)))
    }

    pub fn parse_fetch_appliance_signals(&self, response: HttpResponse) -> Result<Vec<Signal>, ApiError> {
        parse_json(response)
    }

    pub fn build_create_appliance_signal(
        &self,
        appliance: &str,
        message: &InfraredSignal,
        image: &str,
        name: &str,
    ) -> Result<HttpRequest, ApiError> {
        let message = form::embed_json(message)?;
        self.post_form(
            &format!("/appliances/{}/signals", segment(appliance)),
            &NewSignal { message, image, name },
        )
    }

    pub fn parse_create_appliance_signal(&self, response: HttpResponse) -> Result<Signal, ApiError> {
        parse_json(response)
    }

    pub fn build_reorder_appliance_signals<S: AsRef<str>>(
        &self,
        appliance: &str,
        signals: &[S],
    ) -> Result<HttpRequest, ApiError> {
        let signals = form::join_list(signals);
        self.post_form(&format!("/appliances/{}/signal_orders", segment(appliance)), &SignalOrder { signals })
    }

    pub fn parse_reorder_appliance_signals(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response)
    }

    // -- signals ------------------------------------------------------------

    pub fn build_update_signal(
        &self,
        signal: &str,
        image: &str,
        name: &str,
    ) -> Result<HttpRequest, ApiError> {
        self.post_form(&format!("/signals/{}", segment(signal)), &ImageName { image, name })
    }

    pub fn parse_update_signal(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response)
    }

    pub fn build_delete_signal(&self, signal: &str) -> HttpRequest {
        self.post(&format!("/signals/{}/delete", segment(signal)), None)
    }

    pub fn parse_delete_signal(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response)
    }

    pub fn build_send_signal(&self, signal: &str) -> HttpRequest {
        self.post(&format!("/signals/{}/send", segment(signal)), None)
    }

    pub fn parse_send_signal(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response)
    }

    // -- plumbing -----------------------------------------------------------

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("authorization".to_string(), format!("Bearer {}", self.token)),
            ("accept".to_string(), "application/json".to_string()),
            ("content-type".to_string(), form::CONTENT_TYPE.to_string()),
        ]
    }

    fn get(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{path}", self.base_url),
            headers: self.headers(),
            body: None,
        }
    }

    fn post(&self, path: &str, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{path}", self.base_url),
            headers: self.headers(),
            body,
        }
    }

    fn post_form<T: Serialize + ?Sized>(&self, path: &str, fields: &T) -> Result<HttpRequest, ApiError> {
        let body = form::encode(fields)?;
        Ok(self.post(path, Some(body)))
    }
}

/// Any 2xx is success; everything else becomes `HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn parse_empty(response: HttpResponse) -> Result<(), ApiError> {
    check_status(&response)
}
