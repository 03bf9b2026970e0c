//! FILENAME: tests/test_derivation.rs
//! PURPOSE: End-to-end tests for the row-model derivation pipeline.

use std::rc::Rc;

use table_engine::{
    ColumnDef, ColumnSort, ExpandedState, FilterValue, PaginationState, SortDirection, Table,
    TableError, TableOptions, TableState, TableValue, Updater,
};

#[derive(Clone)]
struct Person {
    name: &'static str,
    age: i64,
    city: &'static str,
    reports: Vec<Person>,
}

fn person(name: &'static str, age: i64, city: &'static str) -> Person {
    Person {
        name,
        age,
        city,
        reports: Vec::new(),
    }
}

fn people() -> Vec<Person> {
    vec![
        person("Alice", 25, "Oslo"),
        person("Bob", 17, "Bergen"),
        person("Carol", 40, "Oslo"),
        person("Dave", 33, "Bergen"),
        person("Erin", 29, "Oslo"),
    ]
}

fn person_columns() -> Vec<ColumnDef<Person>> {
    vec![
        ColumnDef::new("name", |p: &Person| TableValue::from(p.name)),
        ColumnDef::new("age", |p: &Person| TableValue::Int(p.age)),
        ColumnDef::new("city", |p: &Person| TableValue::from(p.city)),
    ]
}

fn person_table() -> Table<Person> {
    Table::new(
        TableOptions::new(people(), person_columns()).with_get_row_id(|p, _, _| p.name.to_string()),
    )
    .unwrap()
}

fn names(table: &Table<Person>) -> Vec<String> {
    table
        .row_model()
        .unwrap()
        .rows
        .iter()
        .map(|r| r.id.clone())
        .collect()
}

fn age_range(min: f64, max: f64) -> FilterValue {
    FilterValue::Range {
        min: Some(min),
        max: Some(max),
    }
}

// ============================================================================
// FILTER -> SORT -> PAGINATE
// ============================================================================

#[test]
fn test_filter_sort_paginate_composition() {
    let table = person_table();
    table.set_column_filter("age", age_range(18.0, 100.0)).unwrap();
    table
        .set_sorting(Updater::Set(vec![ColumnSort {
            id: "age".to_string(),
            direction: SortDirection::Ascending,
        }]))
        .unwrap();
    table.set_page_size(1).unwrap();
    table.set_page_index(1).unwrap();

    // Adults sorted ascending: Alice(25), Erin(29), Dave(33), Carol(40)
    assert_eq!(names(&table), vec!["Erin".to_string()]);
    assert_eq!(table.page_count().unwrap(), 4);
}

#[test]
fn test_filter_excludes_and_keeps_relative_order() {
    let table = person_table();
    table.set_column_filter("city", FilterValue::Value(TableValue::from("Oslo"))).unwrap();
    assert_eq!(names(&table), vec!["Alice", "Carol", "Erin"]);
}

#[test]
fn test_empty_filter_value_is_a_no_op() {
    let table = person_table();
    let before = table.row_model().unwrap();
    table
        .set_column_filter("age", FilterValue::Range { min: None, max: None })
        .unwrap();
    let after = table.row_model().unwrap();
    // Nothing was stored, so the identical model comes back
    assert!(Rc::ptr_eq(&before, &after));
    assert!(table.state().column_filters.is_empty());
}

#[test]
fn test_global_filter_matches_any_searchable_column() {
    let table = person_table();
    table
        .set_global_filter(Some(FilterValue::Value(TableValue::from("berg"))))
        .unwrap();
    assert_eq!(names(&table), vec!["Bob", "Dave"]);
}

#[test]
fn test_sort_is_stable_for_equal_keys() {
    let table = person_table();
    table
        .set_sorting(Updater::Set(vec![ColumnSort {
            id: "city".to_string(),
            direction: SortDirection::Ascending,
        }]))
        .unwrap();
    // Bergen before Oslo; within each city the source order holds
    assert_eq!(names(&table), vec!["Bob", "Dave", "Alice", "Carol", "Erin"]);
}

#[test]
fn test_sorting_already_sorted_input_is_identity() {
    let sort = vec![ColumnSort {
        id: "city".to_string(),
        direction: SortDirection::Ascending,
    }];
    let table = person_table();
    table.set_sorting(Updater::Set(sort.clone())).unwrap();
    let once = names(&table);

    // Re-sorting the sorted order under the same keys changes nothing
    let sorted_people: Vec<Person> = once
        .iter()
        .map(|id| people().into_iter().find(|p| p.name == *id).unwrap())
        .collect();
    let resorted = Table::new(
        TableOptions::new(sorted_people, person_columns())
            .with_get_row_id(|p, _, _| p.name.to_string()),
    )
    .unwrap();
    resorted.set_sorting(Updater::Set(sort)).unwrap();
    assert_eq!(names(&resorted), once);
}

#[test]
fn test_toggle_sorting_cycles_through_directions() {
    let table = person_table();
    let column = table.column("age").unwrap();

    column.toggle_sorting(None, false).unwrap();
    assert_eq!(column.sort_direction().unwrap(), Some(SortDirection::Ascending));
    column.toggle_sorting(None, false).unwrap();
    assert_eq!(column.sort_direction().unwrap(), Some(SortDirection::Descending));
    column.toggle_sorting(None, false).unwrap();
    assert_eq!(column.sort_direction().unwrap(), None);
}

#[test]
fn test_multi_sort_appends_secondary_key() {
    let table = person_table();
    table.column("city").unwrap().toggle_sorting(None, false).unwrap();
    table
        .column("age")
        .unwrap()
        .toggle_sorting(Some(SortDirection::Descending), true)
        .unwrap();

    assert_eq!(table.column("city").unwrap().sort_index().unwrap(), Some(0));
    assert_eq!(table.column("age").unwrap().sort_index().unwrap(), Some(1));
    assert_eq!(names(&table), vec!["Dave", "Bob", "Carol", "Erin", "Alice"]);
}

// ============================================================================
// PAGINATION PROPERTIES
// ============================================================================

#[test]
fn test_pages_partition_the_expanded_model() {
    let table = person_table();
    table.set_page_size(2).unwrap();

    let mut collected = Vec::new();
    for page in 0..table.page_count().unwrap() {
        table.set_page_index(page).unwrap();
        collected.extend(names(&table));
    }
    let all: Vec<String> = table
        .pre_paginated_row_model()
        .unwrap()
        .rows
        .iter()
        .map(|r| r.id.clone())
        .collect();
    assert_eq!(collected, all);
}

#[test]
fn test_out_of_range_page_index_clamps() {
    let table = person_table();
    table.set_page_size(2).unwrap();
    table.set_page_index(99).unwrap();
    // Last page: 5 rows at size 2 -> page 2 holds the remainder
    assert_eq!(names(&table), vec!["Erin"]);
    assert!(!table.can_next_page().unwrap());
    assert!(table.can_previous_page().unwrap());
}

#[test]
fn test_page_navigation_guards() {
    let table = person_table();
    table.set_page_size(2).unwrap();
    assert!(!table.can_previous_page().unwrap());

    table.next_page().unwrap();
    table.next_page().unwrap();
    assert_eq!(table.state().pagination.page_index, 2);
    // At the last page a further step is a no-op
    table.next_page().unwrap();
    assert_eq!(table.state().pagination.page_index, 2);
}

#[test]
fn test_zero_page_size_yields_empty_window() {
    let table = person_table();
    table.set_page_size(0).unwrap();
    assert!(table.row_model().unwrap().rows.is_empty());
    assert_eq!(table.page_count().unwrap(), 0);
}

// ============================================================================
// FACETING
// ============================================================================

#[test]
fn test_facet_counts_sum_to_facet_model_rows() {
    let table = person_table();
    let unique = table.column("city").unwrap().faceted_unique_values().unwrap();
    let total: usize = unique.iter().map(|(_, count)| count).sum();
    assert_eq!(total, 5);
    // First-occurrence order
    assert_eq!(unique[0].0, TableValue::from("Oslo"));
    assert_eq!(unique[0].1, 3);
}

#[test]
fn test_facet_excludes_own_column_filter() {
    let table = person_table();
    table
        .set_column_filter("city", FilterValue::Value(TableValue::from("Oslo")))
        .unwrap();
    table.set_column_filter("age", age_range(18.0, 30.0)).unwrap();

    // The city facet sees the age filter but not its own: only Alice(25) and
    // Erin(29) are in range, both in Oslo.
    let unique = table.column("city").unwrap().faceted_unique_values().unwrap();
    let oslo = unique.iter().find(|(v, _)| *v == TableValue::from("Oslo")).unwrap();
    assert_eq!(oslo.1, 2);

    // The age facet ranges over Oslo rows only
    let (min, max) = table.column("age").unwrap().faceted_min_max().unwrap().unwrap();
    assert_eq!(min, 25.0);
    assert_eq!(max, 40.0);
}

// ============================================================================
// GROUPING AND EXPANSION
// ============================================================================

#[test]
fn test_grouping_buckets_in_first_occurrence_order() {
    let table = person_table();
    table.set_grouping(Updater::Set(vec!["city".to_string()])).unwrap();

    let model = table.row_model().unwrap();
    assert_eq!(model.rows.len(), 2);
    assert_eq!(model.rows[0].id, "city:t=Oslo");
    assert_eq!(model.rows[1].id, "city:t=Bergen");
    assert_eq!(model.rows[0].sub_rows.len(), 3);
}

#[test]
fn test_group_ids_stay_distinct_for_same_display_keys() {
    // Int(1) vs Float(1.0) and Null vs Text("") render identically, so the
    // synthetic ids must not rely on display text alone.
    #[derive(Clone)]
    struct Sample {
        id: &'static str,
        key: TableValue,
    }
    let data = vec![
        Sample { id: "a", key: TableValue::Int(1) },
        Sample { id: "b", key: TableValue::from(1.0) },
        Sample { id: "c", key: TableValue::Null },
        Sample { id: "d", key: TableValue::from("") },
    ];
    let columns = vec![
        ColumnDef::new("id", |s: &Sample| TableValue::from(s.id)),
        ColumnDef::new("key", |s: &Sample| s.key.clone()),
    ];
    let table = Table::new(
        TableOptions::new(data, columns).with_get_row_id(|s, _, _| s.id.to_string()),
    )
    .unwrap();
    table.set_grouping(Updater::Set(vec!["key".to_string()])).unwrap();

    let model = table.row_model().unwrap();
    assert_eq!(model.rows.len(), 4);
    let ids: Vec<&str> = model.rows.iter().map(|r| r.id.as_str()).collect();
    let unique: std::collections::HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(unique.len(), 4);
    // Every group row is reachable through the id index
    for id in ids {
        assert!(table.row(id).unwrap().is_some());
    }
}

#[test]
fn test_group_rows_carry_aggregates() {
    let table = person_table();
    table.set_grouping(Updater::Set(vec!["city".to_string()])).unwrap();

    let model = table.row_model().unwrap();
    let oslo = &model.rows[0];
    let age_column = table.column("age").unwrap();
    // Auto-aggregation sums numeric columns: 25 + 40 + 29
    assert_eq!(oslo.value(age_column.column()), TableValue::from(94.0));
    assert!(oslo.is_grouped());
}

#[test]
fn test_expanding_a_group_inlines_its_members() {
    let table = person_table();
    table.set_grouping(Updater::Set(vec!["city".to_string()])).unwrap();

    let row = table.row("city:t=Oslo").unwrap().unwrap();
    assert!(row.can_expand().unwrap());
    row.toggle_expanded(None).unwrap();
    assert!(row.is_expanded().unwrap());

    let ids = names(&table);
    assert_eq!(
        ids,
        vec!["city:t=Oslo", "Alice", "Carol", "Erin", "city:t=Bergen"]
    );
}

#[test]
fn test_toggle_all_rows_expanded() {
    let table = person_table();
    table.set_grouping(Updater::Set(vec!["city".to_string()])).unwrap();

    table.toggle_all_rows_expanded().unwrap();
    assert!(table.is_all_rows_expanded().unwrap());
    assert_eq!(table.row_model().unwrap().rows.len(), 7);

    table.toggle_all_rows_expanded().unwrap();
    assert_eq!(table.state().expanded, ExpandedState::default());
    assert_eq!(table.row_model().unwrap().rows.len(), 2);
}

#[test]
fn test_toggle_expanded_surfaces_derivation_errors() {
    let table = person_table();
    let row = table.row("Alice").unwrap().unwrap();

    // An unknown grouping id breaks the grouped stage; the toggle reports it
    // instead of silently treating the table as having no expandable rows.
    table.set_grouping(Updater::Set(vec!["missing".to_string()])).unwrap();
    assert_eq!(
        row.toggle_expanded(None).err(),
        Some(TableError::UnknownColumn("missing".to_string()))
    );
}

#[test]
fn test_hierarchical_rows_filter_with_their_parent() {
    let mut boss = person("Frank", 51, "Oslo");
    boss.reports = vec![person("Grace", 24, "Oslo"), person("Heidi", 45, "Bergen")];
    let data = vec![boss, person("Ivan", 19, "Bergen")];

    let table = Table::new(
        TableOptions::new(data, person_columns())
            .with_get_row_id(|p, _, _| p.name.to_string())
            .with_get_sub_rows(|p| p.reports.clone()),
    )
    .unwrap();

    // A failing parent takes its whole subtree with it
    table.set_column_filter("age", age_range(0.0, 30.0)).unwrap();
    let model = table.row_model().unwrap();
    let ids: Vec<&str> = model.rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["Ivan"]);

    // A passing parent keeps only its passing descendants
    table.set_column_filter("age", age_range(40.0, 60.0)).unwrap();
    let model = table.row_model().unwrap();
    assert_eq!(model.rows[0].id, "Frank");
    assert_eq!(model.rows[0].sub_rows.len(), 1);
    assert_eq!(model.rows[0].sub_rows[0].id, "Heidi");
}

// ============================================================================
// CELLS AND FLAGS
// ============================================================================

#[test]
fn test_cell_flags_on_grouped_models() {
    let table = person_table();
    table.set_grouping(Updater::Set(vec!["city".to_string()])).unwrap();

    let group_row = table.row("city:t=Oslo").unwrap().unwrap();
    let cells = group_row.visible_cells().unwrap();
    let city_cell = cells.iter().find(|c| c.column().id == "city").unwrap();
    let age_cell = cells.iter().find(|c| c.column().id == "age").unwrap();
    assert!(city_cell.is_grouped().unwrap());
    assert!(!city_cell.is_aggregated().unwrap());
    assert!(age_cell.is_aggregated().unwrap());

    let leaf = table.row("Alice").unwrap().unwrap();
    let leaf_cells = leaf.visible_cells().unwrap();
    let leaf_city = leaf_cells.iter().find(|c| c.column().id == "city").unwrap();
    assert!(leaf_city.is_placeholder().unwrap());
}

#[test]
fn test_visibility_changes_cells_but_not_rows() {
    let table = person_table();
    let rows_before = table.row_model().unwrap();

    table.column("city").unwrap().toggle_visibility(Some(false)).unwrap();

    // Row derivation is untouched (identical model instance)
    assert!(Rc::ptr_eq(&rows_before, &table.row_model().unwrap()));
    let row = table.row("Alice").unwrap().unwrap();
    assert_eq!(row.visible_cells().unwrap().len(), 2);
    assert_eq!(row.all_cells().len(), 3);
}

// ============================================================================
// STATE ROUND-TRIP
// ============================================================================

#[test]
fn test_captured_state_reproduces_the_view() {
    let table = person_table();
    table.set_column_filter("age", age_range(18.0, 100.0)).unwrap();
    table.column("age").unwrap().toggle_sorting(None, false).unwrap();
    table.set_page_size(2).unwrap();
    let expected = names(&table);

    let json = serde_json::to_string(&table.state()).unwrap();
    let restored: TableState = serde_json::from_str(&json).unwrap();

    let fresh = Table::new(
        TableOptions::new(people(), person_columns())
            .with_get_row_id(|p, _, _| p.name.to_string())
            .with_initial_state(restored),
    )
    .unwrap();
    assert_eq!(names(&fresh), expected);
}

#[test]
fn test_default_pagination_state() {
    assert_eq!(
        PaginationState::default(),
        PaginationState {
            page_index: 0,
            page_size: 10
        }
    );
}
