use wallet_core::{Record, RecordDraft, RecordList, RecordRules, ValidationError};

type Row = (f64, &'static str, &'static str, &'static str);

const LEDGER: &[Row] = &[
    (134.6785, "income", "2024-5-5", "That description doesn't make sense."),
    (31.0, "expense", "2024-1-6", ""),
    (210.75, "income", "2024-4-10", "Bonus payment for project completion."),
    (50.25, "expense", "2024-2-20", "Groceries and other household items."),
    (85.0, "expense", "2024-3-15", "Dinner with friends at a restaurant."),
    (500.0, "income", "2024-4-1", "Tax refund received."),
    (75.5, "expense", "2024-3-22", "Car fuel."),
    (300.0, "income", "2024-1-15", "Freelance gig payment."),
    (120.0, "expense", "2024-3-10", "Utility bills."),
    (250.0, "expense", "2024-5-3", "Car maintenance and repairs."),
    (400.0, "income", "2024-5-5", "Monthly salary."),
    (1042.52, "income", "2021-3-1", "Продукты"),
];

fn list_from(rows: &[Row]) -> RecordList {
    let mut list = RecordList::new();
    for (amount, category, date, description) in rows {
        list.insert_last(*amount, *category, *date, *description)
            .unwrap();
    }
    list
}

fn amounts(list: &RecordList) -> Vec<f64> {
    list.iter().map(Record::amount).collect()
}

#[test]
fn length_tracks_inserts_and_removals() {
    let mut list = RecordList::new();
    for (amount, category, date, description) in LEDGER {
        list.insert_first(*amount, *category, *date, *description)
            .unwrap();
    }
    assert_eq!(list.length(), LEDGER.len());

    for _ in 0..3 {
        assert!(list.remove_by_index(0));
    }
    assert_eq!(list.length(), LEDGER.len() - 3);

    let mut empty = RecordList::new();
    assert!(!empty.remove_by_index(0));
    assert_eq!(empty.length(), 0);
}

#[test]
fn insert_first_reverses_order() {
    let mut list = RecordList::new();
    for (amount, category, date, description) in LEDGER {
        list.insert_first(*amount, *category, *date, *description)
            .unwrap();
    }

    let expected: Vec<f64> = LEDGER.iter().rev().map(|row| row.0).collect();
    assert_eq!(amounts(&list), expected);
}

#[test]
fn insert_last_keeps_order() {
    let list = list_from(LEDGER);
    let expected: Vec<f64> = LEDGER.iter().map(|row| row.0).collect();
    assert_eq!(amounts(&list), expected);
}

#[test]
fn get_returns_head_handle_for_manual_traversal() {
    let mut list = RecordList::new();
    assert!(list.get().is_none());

    list.insert_first(123.0, "income", "2024-12-1", "").unwrap();
    list.insert_last(7.0, "expense", "2024-12-2", "").unwrap();

    let head = list.get().unwrap();
    assert_eq!(head.value().amount(), 123.0);
    let second = head.next().unwrap();
    assert_eq!(second.value().amount(), 7.0);
    assert!(second.next().is_none());
}

#[test]
fn invalid_insert_does_not_change_the_list() {
    let mut list = list_from(&LEDGER[..2]);
    let err = list.insert_last(-5.0, "expense", "2024-1-1", "x").unwrap_err();

    assert!(matches!(err, ValidationError::BelowMinimum { .. }));
    assert_eq!(list.length(), 2);
}

#[test]
fn get_by_amount_matches_exactly() {
    let rows: &[Row] = &[
        (134.4234, "income", "2024-5-5", "a"),
        (123.31, "expense", "2024-1-6", ""),
        (4234.424, "income", "2024-4-10", "b"),
    ];
    let list = list_from(rows);

    for (amount, ..) in rows {
        assert_eq!(list.get_by_amount(*amount).unwrap().len(), 1);
    }
    assert!(list.get_by_amount(134.42).unwrap().is_empty());
}

#[test]
fn get_by_amount_rejects_invalid_query_value() {
    let list = list_from(LEDGER);
    assert!(list.get_by_amount(-1.0).is_err());
}

#[test]
fn get_by_category_counts_every_match_with_scan_indices() {
    let list = list_from(LEDGER);

    let income = list.get_by_category("income").unwrap();
    let expected: Vec<usize> = LEDGER
        .iter()
        .enumerate()
        .filter(|(_, row)| row.1 == "income")
        .map(|(index, _)| index)
        .collect();
    assert_eq!(income.keys().copied().collect::<Vec<_>>(), expected);
    assert!(income.values().all(|record| record.category() == "income"));

    assert!(list.get_by_category("transfer").is_err());
}

#[test]
fn get_by_date_compares_text() {
    let list = list_from(LEDGER);

    let found = list.get_by_date("2024-5-5").unwrap();
    assert_eq!(found.keys().copied().collect::<Vec<_>>(), vec![0, 10]);

    assert!(list.get_by_date("2024-05-05").unwrap().is_empty());
    assert!(list.get_by_date("2024-5-50").is_err());
}

#[test]
fn scans_on_empty_list_return_empty_maps() {
    let list = RecordList::new();
    assert!(list.get_by_amount(1.0).unwrap().is_empty());
    assert!(list.get_by_category("income").unwrap().is_empty());
    assert!(list.get_by_date("2024-1-1").unwrap().is_empty());
}

#[test]
fn remove_by_index_rejects_out_of_range() {
    let mut list = list_from(&LEDGER[..4]);

    assert!(!list.remove_by_index(10));
    assert!(!list.remove_by_index(4));
    assert!(!list.remove_by_index(-1));
    assert_eq!(list.length(), 4);
}

#[test]
fn remove_head_promotes_second_node() {
    let mut list = list_from(&LEDGER[..4]);
    assert!(list.remove_by_index(0));

    assert_eq!(list.length(), 3);
    assert_eq!(list.get().unwrap().value().amount(), LEDGER[1].0);
}

#[test]
fn remove_middle_and_tail_keep_links_intact() {
    let mut list = list_from(&LEDGER[..4]);

    assert!(list.remove_by_index(1));
    assert_eq!(amounts(&list), vec![LEDGER[0].0, LEDGER[2].0, LEDGER[3].0]);

    assert!(list.remove_by_index(2));
    assert_eq!(amounts(&list), vec![LEDGER[0].0, LEDGER[2].0]);

    list.insert_last(1.0, "income", "2024-1-1", "").unwrap();
    assert_eq!(amounts(&list), vec![LEDGER[0].0, LEDGER[2].0, 1.0]);
}

#[test]
fn removing_last_node_empties_list() {
    let mut list = list_from(&LEDGER[..1]);
    assert!(list.remove_by_index(0));

    assert!(list.is_empty());
    assert!(list.get().is_none());

    list.insert_last(2.0, "income", "2024-1-1", "").unwrap();
    assert_eq!(amounts(&list), vec![2.0]);
}

#[test]
fn update_by_index_changes_only_supplied_fields() {
    let mut empty = RecordList::new();
    assert!(!empty
        .update_by_index(0, &RecordDraft::new().with_amount(1.0))
        .unwrap());

    let mut list = list_from(&LEDGER[..5]);
    let full = RecordDraft::new()
        .with_amount(123.456)
        .with_category("income")
        .with_date("2021-4-4")
        .with_description("");
    assert!(list.update_by_index(0, &full).unwrap());
    assert!(list
        .update_by_index(1, &RecordDraft::new().with_amount(535.535))
        .unwrap());
    assert!(list
        .update_by_index(2, &RecordDraft::new().with_category("expense"))
        .unwrap());
    assert!(list
        .update_by_index(3, &RecordDraft::new().with_date("2011-2-2"))
        .unwrap());
    assert!(list
        .update_by_index(4, &RecordDraft::new().with_description("Not Empty"))
        .unwrap());

    let records: Vec<&Record> = list.iter().collect();
    assert_eq!(records[0].amount(), 123.456);
    assert_eq!(records[0].description(), "");
    assert_eq!(records[1].amount(), 535.535);
    assert_eq!(records[1].category(), LEDGER[1].1);
    assert_eq!(records[2].category(), "expense");
    assert_eq!(records[3].date(), "2011-2-2");
    assert_eq!(records[4].description(), "Not Empty");
    assert_eq!(records[4].amount(), LEDGER[4].0);
}

#[test]
fn update_by_index_accepts_zero_and_empty_values() {
    let mut list = list_from(&LEDGER[..1]);
    let changes = RecordDraft::new().with_amount(0.0).with_description("");

    assert!(list.update_by_index(0, &changes).unwrap());
    let head = list.get().unwrap().value();
    assert_eq!(head.amount(), 0.0);
    assert_eq!(head.description(), "");
}

#[test]
fn update_by_index_rejects_out_of_range_and_invalid_values() {
    let mut list = list_from(&LEDGER[..2]);
    let changes = RecordDraft::new().with_amount(1.0);

    assert!(!list.update_by_index(-1, &changes).unwrap());
    assert!(!list.update_by_index(2, &changes).unwrap());

    let err = list
        .update_by_index(0, &RecordDraft::new().with_date("2024-2-30"))
        .unwrap_err();
    assert!(matches!(err, ValidationError::ImpossibleDate { .. }));
}

#[test]
fn from_records_and_into_records_preserve_order() {
    let records: Vec<Record> = LEDGER
        .iter()
        .map(|(amount, category, date, description)| {
            Record::new(*amount, *category, *date, *description).unwrap()
        })
        .collect();

    let list = RecordList::from_records(RecordRules::standard(), records.clone()).unwrap();
    assert_eq!(list.length(), records.len());
    assert_eq!(list.into_records(), records);
}

#[test]
fn push_first_prepends_checked_records() {
    let mut list = list_from(&LEDGER[..2]);
    let record = Record::new(9.0, "expense", "2024-7-7", "front").unwrap();

    list.push_first(record).unwrap();
    assert_eq!(amounts(&list), vec![9.0, LEDGER[0].0, LEDGER[1].0]);
    assert!(list.rules().check_record(list.get().unwrap().value()).is_ok());
}

#[test]
fn push_rechecks_records_against_list_rules() {
    let decoded: Record = serde_json::from_value(serde_json::json!({
        "amount": 1.0,
        "date": "2024-1-1",
        "category": "transfer",
        "description": ""
    }))
    .unwrap();

    let mut list = list_from(&LEDGER[..1]);
    assert!(list.push_first(decoded.clone()).is_err());
    assert!(list.push_last(decoded).is_err());
    assert_eq!(list.length(), 1);
}
