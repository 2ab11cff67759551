//! Integration tests for the Diesel record stores against embedded PostgreSQL.
//!
//! Each test provisions its own migrated database. Set `SKIP_TEST_CLUSTER=1`
//! to skip when the cluster cannot start.

use backend::domain::ports::{RecordStore, RecordStoreError};
use backend::domain::{Record, RecordPatch};
use backend::outbound::persistence::{DbPool, DieselIncomeStore, DieselMoneyStore, PoolConfig};
use futures_util::future::join_all;
use pagination::{PageRequest, SortDirection, SortOrder};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

mod support;

use support::{drop_table, handle_cluster_setup_failure, provision_migrated_database};

struct TestContext {
    runtime: Runtime,
    incomes: DieselIncomeStore,
    monies: DieselMoneyStore,
    database_url: String,
    _database: TemporaryDatabase,
}

fn setup_test_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let database = provision_migrated_database()?;
    let database_url = database.url().to_owned();

    let config = PoolConfig::new(&database_url)
        .with_max_size(4)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        incomes: DieselIncomeStore::new(pool.clone()),
        monies: DieselMoneyStore::new(pool),
        database_url,
        _database: database,
    })
}

#[fixture]
fn context() -> Option<TestContext> {
    match setup_test_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn income(amount: i32) -> Record {
    Record::new()
        .with_name(format!("income {amount}"))
        .with_income_amount(amount)
}

#[rstest]
fn insert_assigns_ids_and_reads_back(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    ctx.runtime.block_on(async {
        let first = ctx.incomes.save(&income(1)).await.expect("insert");
        let second = ctx.incomes.save(&income(2)).await.expect("insert");
        let first_id = first.id.expect("assigned id");
        let second_id = second.id.expect("assigned id");
        assert!(second_id > first_id);

        let fetched = ctx
            .incomes
            .find_by_id(first_id)
            .await
            .expect("select")
            .expect("row present");
        assert_eq!(fetched.name.as_deref(), Some("income 1"));
        assert_eq!(fetched.roll, None);
        assert_eq!(fetched.income_amount, Some(1));
        assert!(ctx.incomes.exists_by_id(first_id).await.expect("exists"));
    });
}

#[rstest]
fn overwrite_replaces_every_column(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    ctx.runtime.block_on(async {
        let saved = ctx
            .monies
            .save(&Record::new().with_name("a").with_roll("r1").with_income_amount(1))
            .await
            .expect("insert");
        let id = saved.id.expect("assigned id");

        let replaced = ctx
            .monies
            .save(&Record::new().with_id(id).with_roll("r2").with_income_amount(9))
            .await
            .expect("update");

        assert_eq!(replaced.id, Some(id));
        assert_eq!(replaced.name, None);
        assert_eq!(replaced.roll.as_deref(), Some("r2"));
        assert_eq!(replaced.income_amount, Some(9));
    });
}

#[rstest]
fn overwriting_a_missing_row_reports_missing(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    let result = ctx
        .runtime
        .block_on(ctx.incomes.save(&income(1).with_id(404)));

    assert_eq!(result, Err(RecordStoreError::missing(404_i64)));
}

#[rstest]
fn merge_update_keeps_absent_fields(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    ctx.runtime.block_on(async {
        let saved = ctx
            .monies
            .save(&Record::new().with_name("keep").with_roll("r1").with_income_amount(1))
            .await
            .expect("insert");
        let id = saved.id.expect("assigned id");

        let patch = RecordPatch {
            roll: Some("r2".to_owned()),
            ..RecordPatch::default()
        };
        let merged = ctx
            .monies
            .merge_update(id, &patch)
            .await
            .expect("merge")
            .expect("row present");

        assert_eq!(merged.name.as_deref(), Some("keep"));
        assert_eq!(merged.roll.as_deref(), Some("r2"));
        assert_eq!(merged.income_amount, Some(1));

        let missing = ctx.monies.merge_update(id + 100, &patch).await.expect("merge");
        assert_eq!(missing, None);
    });
}

#[rstest]
fn concurrent_merges_keep_every_field(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    ctx.runtime.block_on(async {
        let saved = ctx
            .monies
            .save(&Record::new().with_name("seed").with_roll("seed").with_income_amount(7))
            .await
            .expect("insert");
        let id = saved.id.expect("assigned id");

        let patches: Vec<RecordPatch> = (0..12)
            .map(|i| {
                if i % 2 == 0 {
                    RecordPatch {
                        name: Some(format!("name-{i}")),
                        ..RecordPatch::default()
                    }
                } else {
                    RecordPatch {
                        roll: Some(format!("roll-{i}")),
                        ..RecordPatch::default()
                    }
                }
            })
            .collect();
        let merges = patches.iter().map(|patch| ctx.monies.merge_update(id, patch));
        for result in join_all(merges).await {
            result.expect("merge").expect("row present");
        }

        let stored = ctx
            .monies
            .find_by_id(id)
            .await
            .expect("select")
            .expect("row present");
        assert!(stored.name.as_deref().is_some_and(|n| n.starts_with("name-")));
        assert!(stored.roll.as_deref().is_some_and(|r| r.starts_with("roll-")));
        assert_eq!(stored.income_amount, Some(7));
    });
}

#[rstest]
fn find_all_pages_sorts_and_counts(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    ctx.runtime.block_on(async {
        for amount in [3, 1, 2] {
            ctx.incomes.save(&income(amount)).await.expect("insert");
        }

        let request = PageRequest::new(0, 2)
            .with_sort(SortOrder::new("income", SortDirection::Desc));
        let page = ctx.incomes.find_all(&request).await.expect("page");

        assert_eq!(page.total(), 3);
        let amounts: Vec<Option<i32>> = page.content().iter().map(|r| r.income_amount).collect();
        assert_eq!(amounts, vec![Some(3), Some(2)]);

        let tail = ctx
            .incomes
            .find_all(&PageRequest::new(1, 2))
            .await
            .expect("page");
        assert_eq!(tail.content().len(), 1);
    });
}

#[rstest]
fn delete_is_idempotent(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    ctx.runtime.block_on(async {
        let saved = ctx.incomes.save(&income(1)).await.expect("insert");
        let id = saved.id.expect("assigned id");

        ctx.incomes.delete_by_id(id).await.expect("delete");
        ctx.incomes.delete_by_id(id).await.expect("second delete");

        assert!(!ctx.incomes.exists_by_id(id).await.expect("exists"));
    });
}

#[rstest]
fn stores_use_separate_tables(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    ctx.runtime.block_on(async {
        let saved = ctx.incomes.save(&income(1)).await.expect("insert");
        let id = saved.id.expect("assigned id");

        assert_eq!(ctx.monies.find_by_id(id).await.expect("select"), None);
    });
}

#[rstest]
fn missing_tables_surface_as_query_errors(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    drop_table(&ctx.database_url, "money").expect("drop money table");

    let result = ctx.runtime.block_on(ctx.monies.find_by_id(1));

    assert!(matches!(result, Err(RecordStoreError::Query { .. })));
}
