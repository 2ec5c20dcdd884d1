use condsql::{
    Condition, Database, Executor, InstrumentedClient, JoinCondition, PostProcess, Record, Row,
    SearchRequest, SearchSchema, SqlError, SqlResult, StatementKind, StatsMonitor, Value,
};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Records every statement and answers with canned rows.
#[derive(Default)]
struct RecordingExecutor {
    statements: Mutex<Vec<String>>,
    rows: Vec<Record>,
    fail_with: Option<String>,
}

impl RecordingExecutor {
    fn with_rows(rows: Vec<Record>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

impl Executor for RecordingExecutor {
    async fn execute_sql(&self, sql: &str) -> SqlResult<Vec<Record>> {
        self.statements.lock().unwrap().push(sql.to_string());
        match &self.fail_with {
            Some(message) => Err(SqlError::execution(message.clone())),
            None => Ok(self.rows.clone()),
        }
    }
}

#[tokio::test]
async fn crud_statements_reach_the_executor() {
    let db = Database::new(RecordingExecutor::default());
    let pet = db.table("Pet");

    pet.insert(&Row::new().set("name", "Rex").set("height", 40))
        .await
        .unwrap();
    pet.select(
        &Condition::eq("sex", "M"),
        &["name", "height"],
        &PostProcess::new().sort_desc("height").limit(2),
    )
    .await
    .unwrap();
    pet.update(&Condition::eq("name", "Rex"), &Row::new().set("height", 42))
        .await
        .unwrap();
    pet.delete(&Condition::lt("height", 10)).await.unwrap();

    assert_eq!(
        db.executor().statements(),
        [
            "INSERT INTO `Pet`(`name`, `height`) VALUES (\"Rex\", 40)",
            "SELECT `name`, `height` FROM `Pet` WHERE `sex` = \"M\" ORDER BY `height` DESC LIMIT 2",
            "UPDATE `Pet` SET `height` = 42 WHERE `name` = \"Rex\"",
            "DELETE FROM `Pet` WHERE `height` < 10",
        ]
    );
}

#[tokio::test]
async fn select_returns_executor_rows() {
    let rows = vec![
        Record::new().with("name", Value::Text("Rex".into())),
        Record::new().with("name", Value::Text("Tom".into())),
    ];
    let db = Database::new(RecordingExecutor::with_rows(rows));
    let condition = Condition::from_json(&json!({"name": {"$ne": "Bob"}})).unwrap();

    let found = db
        .table("Pet")
        .select(&condition, &[] as &[&str], &PostProcess::range(10, 20).unwrap())
        .await
        .unwrap();

    assert_eq!(found.len(), 2);
    assert_eq!(found[1].get("name"), Some(&Value::Text("Tom".into())));
    assert_eq!(
        db.executor().statements(),
        ["SELECT * FROM `Pet` WHERE `name` != \"Bob\" LIMIT 10 OFFSET 10"]
    );
}

#[tokio::test]
async fn joined_tables_are_read_only() {
    let db = Database::new(RecordingExecutor::default());
    let pet = db.table("Pet");
    let breed = db.table("Breed");
    let joined = pet
        .join(&breed, &JoinCondition::on("Pet", "breed_name", "Breed", "name"))
        .unwrap();
    assert!(joined.is_joined());

    let err = joined.insert(&Row::new().set("name", "Rex")).await.unwrap_err();
    assert!(err.is_write_guard());
    let err = joined
        .update(&Condition::Empty, &Row::new().set("name", "Rex"))
        .await
        .unwrap_err();
    assert!(err.is_write_guard());
    let err = joined.delete(&Condition::Empty).await.unwrap_err();
    assert!(err.is_write_guard());

    joined
        .select(&Condition::eq("size", "small"), &["name", "size"], &PostProcess::new())
        .await
        .unwrap();

    // Refused writes never reach the executor.
    assert_eq!(
        db.executor().statements(),
        ["SELECT `name`, `size` FROM `Pet` JOIN `Breed` ON `Pet`.`breed_name` = `Breed`.`name` \
          WHERE `size` = \"small\""]
    );
}

#[tokio::test]
async fn natural_join_chains() {
    let db = Database::new(RecordingExecutor::default());
    let joined = db
        .table("Pet")
        .natural_join(&db.table("Breed"))
        .join(&db.table("PetShop"), &JoinCondition::Natural)
        .unwrap();

    joined
        .select(&Condition::Empty, &[] as &[&str], &PostProcess::new())
        .await
        .unwrap();
    assert_eq!(
        db.executor().statements(),
        ["SELECT * FROM `Pet` NATURAL JOIN `Breed` NATURAL JOIN `PetShop`"]
    );
}

#[tokio::test]
async fn execution_errors_pass_through() {
    let db = Database::new(RecordingExecutor::failing("Duplicate entry 'Rex'"));
    let err = db
        .table("Pet")
        .insert(&Row::new().set("name", "Rex"))
        .await
        .unwrap_err();
    match err {
        SqlError::Execution(message) => assert_eq!(message, "Duplicate entry 'Rex'"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn schema_violations_never_reach_the_executor() {
    let db = Database::new(RecordingExecutor::default());
    let err = db
        .table("Pet")
        .update(&Condition::or([]), &Row::new().set("a", 1))
        .await
        .unwrap_err();
    assert!(err.is_schema_violation());
    assert!(db.executor().statements().is_empty());
}

#[tokio::test]
async fn raw_sql_is_forwarded() {
    let db = Database::new(RecordingExecutor::default());
    db.execute_sql("CALL refresh_ratings()").await.unwrap();
    assert_eq!(db.executor().statements(), ["CALL refresh_ratings()"]);
}

#[tokio::test]
async fn search_runs_planned_select() {
    let db = Database::new(RecordingExecutor::default());
    let schema = SearchSchema::pet_shop();

    db.search(&schema, &SearchRequest::new("Van").table("PetShop").limit(3))
        .await
        .unwrap();
    let err = db
        .search(&schema, &SearchRequest::new("Van").table("Owner"))
        .await
        .unwrap_err();
    assert!(err.is_schema_violation());

    assert_eq!(
        db.executor().statements(),
        ["SELECT `name`, `location` FROM `PetShop` WHERE \
          ((`name` LIKE \"%Van%\") OR (`location` LIKE \"%Van%\")) LIMIT 3"]
    );
}

#[tokio::test]
async fn instrumented_database() {
    let stats = Arc::new(StatsMonitor::new());
    let client = InstrumentedClient::new(RecordingExecutor::default())
        .with_timeout(std::time::Duration::from_secs(5))
        .with_monitor(stats.clone());
    let db = Database::new(client);

    let pet = db.table("Pet");
    pet.insert(&Row::new().set("name", "Rex")).await.unwrap();
    pet.select(&Condition::Empty, &["name"], &PostProcess::new())
        .await
        .unwrap();
    pet.delete(&Condition::eq("name", "Rex")).await.unwrap();

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.executed, 3);
    assert_eq!(snapshot.count(StatementKind::Insert), 1);
    assert_eq!(snapshot.count(StatementKind::Select), 1);
    assert_eq!(snapshot.count(StatementKind::Delete), 1);
    assert_eq!(snapshot.failed, 0);
    assert_eq!(db.executor().inner().statements().len(), 3);
}
