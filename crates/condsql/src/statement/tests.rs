use super::*;
use serde_json::json;

const NO_COLS: &[&str] = &[];

fn pet() -> TableRef {
    TableRef::new("Pet")
}

fn joined() -> TableRef {
    TableRef::new("A")
        .equality_join(&TableRef::new("B"), "x", "y")
        .unwrap()
}

// ==================== INSERT ====================

#[test]
fn test_insert_basic() {
    let row = Row::new().set("name", "Rex").set("height", 40).set("color", None::<&str>);
    assert_eq!(
        build_insert(&pet(), &row).unwrap(),
        r#"INSERT INTO `Pet`(`name`, `height`, `color`) VALUES ("Rex", 40, NULL)"#
    );
}

#[test]
fn test_insert_pairs_columns_and_values() {
    let row = Row::from_json(&json!({"b": 2, "a": 1})).unwrap();
    assert_eq!(
        build_insert(&pet(), &row).unwrap(),
        "INSERT INTO `Pet`(`b`, `a`) VALUES (2, 1)"
    );
}

#[test]
fn test_insert_empty_row_rejected() {
    assert!(build_insert(&pet(), &Row::new()).unwrap_err().is_schema_violation());
}

#[test]
fn test_insert_on_join_rejected() {
    let row = Row::new().set("x", 1);
    assert!(build_insert(&joined(), &row).unwrap_err().is_write_guard());
}

#[test]
fn test_write_guard_checked_before_row() {
    // An empty row would be a schema violation, but the guard fires first.
    assert!(build_insert(&joined(), &Row::new()).unwrap_err().is_write_guard());
}

// ==================== SELECT ====================

#[test]
fn test_select_all() {
    assert_eq!(
        build_select(&pet(), &Condition::Empty, NO_COLS, &PostProcess::new()).unwrap(),
        "SELECT * FROM `Pet`"
    );
}

#[test]
fn test_select_columns_where_post() {
    let cond = Condition::from_json(&json!({"sex": "F", "height": {"$gte": 30}})).unwrap();
    let post = PostProcess::new().sort_desc("price").limit(10).offset(20);
    assert_eq!(
        build_select(&pet(), &cond, &["name", "price"], &post).unwrap(),
        r#"SELECT `name`, `price` FROM `Pet` WHERE (`sex` = "F") AND (`height` >= 30) ORDER BY `price` DESC LIMIT 10 OFFSET 20"#
    );
}

#[test]
fn test_select_post_without_where() {
    let post = PostProcess::new().limit(0);
    assert_eq!(
        build_select(&pet(), &Condition::Empty, NO_COLS, &post).unwrap(),
        "SELECT * FROM `Pet` LIMIT 0"
    );
}

#[test]
fn test_select_from_join() {
    let cond = Condition::gt("typical_age", 10);
    let table = pet()
        .equality_join(&TableRef::new("Breed"), "breed_name", "name")
        .unwrap();
    assert_eq!(
        build_select(&table, &cond, NO_COLS, &PostProcess::new().limit(15)).unwrap(),
        "SELECT * FROM `Pet` JOIN `Breed` ON `Pet`.`breed_name` = `Breed`.`name` WHERE `typical_age` > 10 LIMIT 15"
    );
}

#[test]
fn test_select_propagates_condition_error() {
    let cond = Condition::And(vec![]);
    assert!(
        build_select(&pet(), &cond, NO_COLS, &PostProcess::new())
            .unwrap_err()
            .is_schema_violation()
    );
}

// ==================== UPDATE ====================

#[test]
fn test_update_with_where() {
    let updates = Row::new().set("price", 120).set("description", "good \"boy\"");
    let cond = Condition::eq("name", "Rex");
    assert_eq!(
        build_update(&pet(), &cond, &updates).unwrap(),
        r#"UPDATE `Pet` SET `price` = 120, `description` = "good \"boy\"" WHERE `name` = "Rex""#
    );
}

#[test]
fn test_update_without_where() {
    let updates = Row::new().set("price", 1);
    assert_eq!(
        build_update(&pet(), &Condition::Empty, &updates).unwrap(),
        "UPDATE `Pet` SET `price` = 1"
    );
}

#[test]
fn test_update_requires_set() {
    assert!(
        build_update(&pet(), &Condition::Empty, &Row::new())
            .unwrap_err()
            .is_schema_violation()
    );
}

#[test]
fn test_update_on_join_rejected() {
    let updates = Row::new().set("x", 1);
    assert!(
        build_update(&joined(), &Condition::Empty, &updates)
            .unwrap_err()
            .is_write_guard()
    );
}

// ==================== DELETE ====================

#[test]
fn test_delete_with_where() {
    let cond = Condition::or([Condition::eq("a", 1), Condition::lt("b", 0)]);
    assert_eq!(
        build_delete(&pet(), &cond).unwrap(),
        "DELETE FROM `Pet` WHERE (`a` = 1) OR (`b` < 0)"
    );
}

#[test]
fn test_delete_all() {
    assert_eq!(
        build_delete(&pet(), &Condition::Empty).unwrap(),
        "DELETE FROM `Pet`"
    );
}

#[test]
fn test_delete_on_natural_join_rejected() {
    let table = TableRef::new("A").natural_join(&TableRef::new("B"));
    assert!(build_delete(&table, &Condition::Empty).unwrap_err().is_write_guard());
}
