//! Response headers for entity alerts and pagination.
//!
//! Successful mutations carry `X-{app}-alert: {app}.{entity}.{action}` and
//! `X-{app}-params: {id}` so clients can show notifications without parsing
//! the body. List responses carry `X-Total-Count` and an RFC 5988 `Link`.

use actix_web::HttpResponseBuilder;
use actix_web::http::header::{self, HeaderName, HeaderValue, InvalidHeaderName};
use pagination::{Page, TOTAL_COUNT_HEADER, link_header};
use tracing::warn;
use url::Url;

/// Mutation reported by an alert header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    /// `created`
    Created,
    /// `updated`
    Updated,
    /// `deleted`
    Deleted,
}

impl AlertAction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

/// Header names derived from the configured application name.
#[derive(Debug, Clone)]
pub struct EntityAlerts {
    app_name: String,
    alert: HeaderName,
    params: HeaderName,
}

impl EntityAlerts {
    /// Build alert headers for `app_name`.
    ///
    /// # Errors
    /// Fails when `app_name` cannot appear in a header name.
    pub fn new(app_name: impl Into<String>) -> Result<Self, InvalidHeaderName> {
        let app_name = app_name.into();
        let alert = HeaderName::try_from(format!("X-{app_name}-alert"))?;
        let params = HeaderName::try_from(format!("X-{app_name}-params"))?;
        Ok(Self {
            app_name,
            alert,
            params,
        })
    }

    /// Application name used as the alert prefix.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Attach alert headers for `action` on `entity` with identifier `id`.
    pub fn apply(
        &self,
        builder: &mut HttpResponseBuilder,
        entity: &str,
        action: AlertAction,
        id: i64,
    ) {
        let message = format!("{}.{entity}.{}", self.app_name, action.as_str());
        match HeaderValue::try_from(message) {
            Ok(value) => {
                builder.insert_header((self.alert.clone(), value));
                builder.insert_header((self.params.clone(), HeaderValue::from(id)));
            }
            Err(error) => warn!(%error, entity, "failed to encode alert header"),
        }
    }
}

/// Attach `X-Total-Count` and `Link` for `page`, relative to `request_url`.
pub fn apply_pagination<T>(builder: &mut HttpResponseBuilder, request_url: &Url, page: &Page<T>) {
    builder.insert_header((TOTAL_COUNT_HEADER, page.total().to_string()));
    match HeaderValue::try_from(link_header(request_url, page)) {
        Ok(value) => {
            builder.insert_header((header::LINK, value));
        }
        Err(error) => warn!(%error, "failed to encode link header"),
    }
}
