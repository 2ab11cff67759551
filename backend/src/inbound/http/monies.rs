//! Money endpoints under `/api/monies`.
//!
//! Unlike incomes, a money record must carry a `roll`.

use super::records::record_endpoints;

record_endpoints! {
    vertical: crate::domain::Money,
    entity: money,
    collection: monies,
    tag: "monies",
    collection_path: "/api/monies",
    item_path: "/api/monies/{id}",
}
