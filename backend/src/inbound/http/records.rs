//! Generic REST handlers for record resources.
//!
//! ```text
//! POST   /api/{resource}        -> 201 + Location + alert headers
//! GET    /api/{resource}        -> 200 + X-Total-Count + Link
//! GET    /api/{resource}/{id}   -> 200 | 404
//! PUT    /api/{resource}/{id}   -> 200 | 400 idnull/idinvalid/idnotfound
//! PATCH  /api/{resource}/{id}   -> 200 | 400 idnull/idinvalid | 404
//! DELETE /api/{resource}/{id}   -> 204
//! ```
//!
//! Each resource module instantiates these through `record_endpoints!`,
//! which also emits the OpenAPI annotations and route table.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use pagination::{PageRequest, PageRequestError};

use crate::domain::{Error, Record, RecordService, Vertical};

use super::ApiResult;
use super::headers::{AlertAction, apply_pagination};
use super::state::{HttpState, RecordServices};

fn service<V>(state: &HttpState) -> &RecordService<V>
where
    V: Vertical,
    HttpState: RecordServices<V>,
{
    RecordServices::<V>::records(state)
}

fn persisted_id<V: Vertical>(record: &Record) -> ApiResult<i64> {
    record.id.ok_or_else(|| {
        Error::internal(format!("{} store returned a record without id", V::ENTITY_NAME))
    })
}

pub(crate) async fn create<V>(
    state: web::Data<HttpState>,
    payload: web::Json<Record>,
) -> ApiResult<HttpResponse>
where
    V: Vertical,
    HttpState: RecordServices<V>,
{
    let created = service::<V>(&state).create(payload.into_inner()).await?;
    let id = persisted_id::<V>(&created)?;

    let mut response = HttpResponse::Created();
    response.insert_header((header::LOCATION, format!("{}/{id}", V::collection_path())));
    state
        .alerts()
        .apply(&mut response, V::ENTITY_NAME, AlertAction::Created, id);
    Ok(response.json(created))
}

pub(crate) async fn replace<V>(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<Record>,
) -> ApiResult<HttpResponse>
where
    V: Vertical,
    HttpState: RecordServices<V>,
{
    let id = path.into_inner();
    let updated = service::<V>(&state)
        .replace(id, payload.into_inner())
        .await?;

    let mut response = HttpResponse::Ok();
    state
        .alerts()
        .apply(&mut response, V::ENTITY_NAME, AlertAction::Updated, id);
    Ok(response.json(updated))
}

pub(crate) async fn partial_update<V>(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<Record>,
) -> ApiResult<HttpResponse>
where
    V: Vertical,
    HttpState: RecordServices<V>,
{
    let id = path.into_inner();
    let merged = service::<V>(&state)
        .partial_update(id, payload.into_inner())
        .await?;

    let mut response = HttpResponse::Ok();
    state
        .alerts()
        .apply(&mut response, V::ENTITY_NAME, AlertAction::Updated, id);
    Ok(response.json(merged))
}

pub(crate) async fn list<V>(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse>
where
    V: Vertical,
    HttpState: RecordServices<V>,
{
    let request = PageRequest::from_query(req.query_string()).map_err(|err| {
        let key = match &err {
            PageRequestError::InvalidSort { .. } => "badsort",
            _ => "badpage",
        };
        Error::bad_parameter(V::ENTITY_NAME, key, err.to_string())
    })?;
    let page = service::<V>(&state).list(&request).await?;

    let mut response = HttpResponse::Ok();
    apply_pagination(&mut response, &req.full_url(), &page);
    Ok(response.json(page.content()))
}

/// Fallback for verbs a resource path does not accept.
pub(crate) async fn unsupported<V: Vertical>(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::method_not_supported(
        V::ENTITY_NAME,
        format!(
            "Request method '{}' is not supported for {}",
            req.method(),
            req.path()
        ),
    ))
}

pub(crate) async fn get<V>(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse>
where
    V: Vertical,
    HttpState: RecordServices<V>,
{
    let record = service::<V>(&state).get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

pub(crate) async fn delete<V>(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse>
where
    V: Vertical,
    HttpState: RecordServices<V>,
{
    let id = path.into_inner();
    service::<V>(&state).delete(id).await?;

    let mut response = HttpResponse::NoContent();
    state
        .alerts()
        .apply(&mut response, V::ENTITY_NAME, AlertAction::Deleted, id);
    Ok(response.finish())
}

/// Declare the documented endpoints and route table for one resource.
///
/// Generates `create_*`, `list_*`, `get_*`, `update_*`, `partial_update_*`
/// and `delete_*` handlers plus `configure`, which registers both paths with
/// a `405` fallback for other verbs.
macro_rules! record_endpoints {
    (
        vertical: $vertical:ty,
        entity: $entity:ident,
        collection: $collection:ident,
        tag: $tag:tt,
        collection_path: $collection_path:tt,
        item_path: $item_path:tt $(,)?
    ) => {
        ::paste::paste! {
            #[doc = "Create a record; the body must not carry an id."]
            #[utoipa::path(
                post,
                path = $collection_path,
                tag = $tag,
                request_body = crate::domain::Record,
                responses(
                    (status = 201, description = "Created", body = crate::domain::Record,
                        headers(("Location" = String, description = "Path of the new record"))),
                    (status = 400, description = "Id present or mandatory field missing",
                        body = crate::domain::Error),
                    (status = 500, description = "Store failure", body = crate::domain::Error)
                )
            )]
            pub async fn [<create_ $entity>](
                state: actix_web::web::Data<crate::inbound::http::state::HttpState>,
                payload: actix_web::web::Json<crate::domain::Record>,
            ) -> crate::inbound::http::ApiResult<actix_web::HttpResponse> {
                crate::inbound::http::records::create::<$vertical>(state, payload).await
            }

            #[doc = "List one page of records."]
            #[utoipa::path(
                get,
                path = $collection_path,
                tag = $tag,
                params(
                    ("page" = Option<u64>, Query, description = "Zero-based page index, default 0"),
                    ("size" = Option<u64>, Query, description = "Page size, default 20, at most 2000"),
                    ("sort" = Option<Vec<String>>, Query,
                        description = "Repeatable `property[,asc|desc]`; properties: id, name, roll, income")
                ),
                responses(
                    (status = 200, description = "Page of records", body = [crate::domain::Record],
                        headers(
                            ("X-Total-Count" = u64, description = "Total number of records"),
                            ("Link" = String, description = "RFC 5988 pagination links")
                        )),
                    (status = 400, description = "Invalid paging or sort parameter",
                        body = crate::domain::Error),
                    (status = 500, description = "Store failure", body = crate::domain::Error)
                )
            )]
            pub async fn [<list_ $collection>](
                state: actix_web::web::Data<crate::inbound::http::state::HttpState>,
                req: actix_web::HttpRequest,
            ) -> crate::inbound::http::ApiResult<actix_web::HttpResponse> {
                crate::inbound::http::records::list::<$vertical>(state, req).await
            }

            #[doc = "Fetch one record."]
            #[utoipa::path(
                get,
                path = $item_path,
                tag = $tag,
                params(("id" = i64, Path, description = "Record identifier")),
                responses(
                    (status = 200, description = "Record", body = crate::domain::Record),
                    (status = 404, description = "No record with this id", body = crate::domain::Error),
                    (status = 500, description = "Store failure", body = crate::domain::Error)
                )
            )]
            pub async fn [<get_ $entity>](
                state: actix_web::web::Data<crate::inbound::http::state::HttpState>,
                path: actix_web::web::Path<i64>,
            ) -> crate::inbound::http::ApiResult<actix_web::HttpResponse> {
                crate::inbound::http::records::get::<$vertical>(state, path).await
            }

            #[doc = "Replace every attribute of a record."]
            #[utoipa::path(
                put,
                path = $item_path,
                tag = $tag,
                params(("id" = i64, Path, description = "Record identifier; must equal the body id")),
                request_body = crate::domain::Record,
                responses(
                    (status = 200, description = "Updated", body = crate::domain::Record),
                    (status = 400, description = "idnull, idinvalid, idnotfound or missing field",
                        body = crate::domain::Error),
                    (status = 500, description = "Store failure", body = crate::domain::Error)
                )
            )]
            pub async fn [<update_ $entity>](
                state: actix_web::web::Data<crate::inbound::http::state::HttpState>,
                path: actix_web::web::Path<i64>,
                payload: actix_web::web::Json<crate::domain::Record>,
            ) -> crate::inbound::http::ApiResult<actix_web::HttpResponse> {
                crate::inbound::http::records::replace::<$vertical>(state, path, payload).await
            }

            #[doc = "Merge the non-null attributes of the body into a record."]
            #[utoipa::path(
                patch,
                path = $item_path,
                tag = $tag,
                params(("id" = i64, Path, description = "Record identifier; must equal the body id")),
                request_body(
                    content = crate::domain::Record,
                    content_type = "application/merge-patch+json",
                    description = "Partial record; application/json is accepted as well"
                ),
                responses(
                    (status = 200, description = "Merged", body = crate::domain::Record),
                    (status = 400, description = "idnull or idinvalid", body = crate::domain::Error),
                    (status = 404, description = "No record with this id", body = crate::domain::Error),
                    (status = 500, description = "Store failure", body = crate::domain::Error)
                )
            )]
            pub async fn [<partial_update_ $entity>](
                state: actix_web::web::Data<crate::inbound::http::state::HttpState>,
                path: actix_web::web::Path<i64>,
                payload: actix_web::web::Json<crate::domain::Record>,
            ) -> crate::inbound::http::ApiResult<actix_web::HttpResponse> {
                crate::inbound::http::records::partial_update::<$vertical>(state, path, payload)
                    .await
            }

            #[doc = "Delete a record; unknown ids succeed."]
            #[utoipa::path(
                delete,
                path = $item_path,
                tag = $tag,
                params(("id" = i64, Path, description = "Record identifier")),
                responses(
                    (status = 204, description = "Deleted"),
                    (status = 500, description = "Store failure", body = crate::domain::Error)
                )
            )]
            pub async fn [<delete_ $entity>](
                state: actix_web::web::Data<crate::inbound::http::state::HttpState>,
                path: actix_web::web::Path<i64>,
            ) -> crate::inbound::http::ApiResult<actix_web::HttpResponse> {
                crate::inbound::http::records::delete::<$vertical>(state, path).await
            }

            /// Register the collection and item resources.
            pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
                use actix_web::web;
                use crate::inbound::http::records::unsupported;

                cfg.service(
                    web::resource($collection_path)
                        .route(web::post().to([<create_ $entity>]))
                        .route(web::get().to([<list_ $collection>]))
                        .default_service(web::to(unsupported::<$vertical>)),
                )
                .service(
                    web::resource($item_path)
                        .route(web::get().to([<get_ $entity>]))
                        .route(web::put().to([<update_ $entity>]))
                        .route(web::patch().to([<partial_update_ $entity>]))
                        .route(web::delete().to([<delete_ $entity>]))
                        .default_service(web::to(unsupported::<$vertical>)),
                );
            }
        }
    };
}

pub(crate) use record_endpoints;

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
