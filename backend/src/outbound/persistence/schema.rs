//! Diesel table definitions matching `backend/migrations`.
//!
//! The amount column is called `income` in both tables; it is exposed as
//! `income_amount` so it does not shadow the `income` table module.

diesel::table! {
    /// Income entries.
    income (id) {
        id -> Int8,
        #[max_length = 255]
        name -> Nullable<Varchar>,
        #[max_length = 255]
        roll -> Nullable<Varchar>,
        #[sql_name = "income"]
        income_amount -> Int4,
    }
}

diesel::table! {
    /// Money entries. `roll` is mandatory here.
    money (id) {
        id -> Int8,
        #[max_length = 255]
        name -> Nullable<Varchar>,
        #[max_length = 255]
        roll -> Varchar,
        #[sql_name = "income"]
        income_amount -> Int4,
    }
}

diesel::allow_tables_to_appear_in_same_query!(income, money);
