//! Income endpoints under `/api/incomes`.

use super::records::record_endpoints;

record_endpoints! {
    vertical: crate::domain::Income,
    entity: income,
    collection: incomes,
    tag: "incomes",
    collection_path: "/api/incomes",
    item_path: "/api/incomes/{id}",
}
