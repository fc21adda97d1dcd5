//! Ledger integration tests

use std::{cell::Cell, rc::Rc};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};

use elidune_ledger::{
    config::LoansConfig,
    models::{BookId, BookQuery, CreateBook, CreateUser, UpdateBook},
    services::{clock::Clock, Services},
    AppError,
};

/// Clock the tests can move forward
#[derive(Clone)]
struct TestClock(Rc<Cell<DateTime<Utc>>>);

impl TestClock {
    fn advance(&self, days: i64) {
        self.0.set(self.0.get() + Duration::days(days));
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.get()
    }
}

/// Helper to build services with a controllable clock
fn setup() -> (Services, TestClock) {
    let clock = TestClock(Rc::new(Cell::new(
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
    )));
    let services = Services::with_clock(LoansConfig::default(), Box::new(clock.clone()));
    (services, clock)
}

fn add_user(services: &mut Services, username: &str, firstname: &str) {
    services
        .users()
        .create_user(CreateUser {
            username: username.to_string(),
            firstname: firstname.to_string(),
            surname: "Reader".to_string(),
            house_number: "42".to_string(),
            street_name: "Library Lane".to_string(),
            postcode: "LB1 0OK".to_string(),
            email: format!("{}@example.org", username),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 7, 9).unwrap(),
        })
        .expect("Failed to create user");
}

fn add_book(services: &mut Services, title: &str, copies: i64) -> BookId {
    services
        .catalog()
        .create_book(CreateBook {
            title: title.to_string(),
            author: "Ursula K. Le Guin".to_string(),
            year: 1969,
            publisher: "Ace Books".to_string(),
            num_copies: copies,
            publication_date: NaiveDate::from_ymd_opt(1969, 3, 1).unwrap(),
        })
        .expect("Failed to create book")
        .id
}

fn available(services: &Services, id: &BookId) -> u32 {
    services
        .repository()
        .books
        .get_by_id(id)
        .expect("Book not found")
        .available_copies()
}

#[test]
fn test_one_copy_passes_between_users() {
    let (mut services, _clock) = setup();
    add_user(&mut services, "alice", "Alice");
    add_user(&mut services, "bob", "Bob");
    let book = add_book(&mut services, "The Left Hand of Darkness", 1);

    services.loans().borrow("alice", &book).unwrap();
    assert_eq!(available(&services, &book), 0);

    let err = services.loans().borrow("bob", &book).unwrap_err();
    assert!(matches!(err, AppError::OutOfStock(_)));
    assert_eq!(available(&services, &book), 0);

    services.loans().return_book("alice", &book).unwrap();
    assert_eq!(available(&services, &book), 1);

    services.loans().borrow("bob", &book).unwrap();
    assert_eq!(available(&services, &book), 0);
}

#[test]
fn test_availability_stays_within_bounds() {
    let (mut services, _clock) = setup();
    let usernames = ["u1", "u2", "u3", "u4"];
    for name in usernames {
        add_user(&mut services, name, name);
    }
    let book = add_book(&mut services, "The Dispossessed", 3);

    // (username, borrow?, expected to succeed?)
    let steps: [(&str, bool, bool); 9] = [
        ("u1", true, true),
        ("u2", true, true),
        ("u3", true, true),
        ("u4", true, false),
        ("u2", false, true),
        ("u4", true, true),
        ("u1", false, true),
        ("u3", false, true),
        ("u4", false, true),
    ];
    for (username, borrow, succeeds) in steps {
        let result = if borrow {
            services.loans().borrow(username, &book).map(|_| ())
        } else {
            services.loans().return_book(username, &book)
        };
        if succeeds {
            assert!(result.is_ok(), "step for {} failed: {:?}", username, result);
        } else {
            assert!(
                matches!(result, Err(AppError::OutOfStock(_))),
                "expected OutOfStock for {}, got {:?}",
                username,
                result
            );
        }
        let avail = available(&services, &book);
        assert!(avail <= 3, "available {} exceeds total after {}", avail, username);
        assert_eq!(
            avail as usize + services.loans().count_active(),
            3,
            "ledger and availability drifted after {}",
            username
        );
    }
    assert_eq!(available(&services, &book), 3);
}

#[test]
fn test_borrow_return_round_trip() {
    let (mut services, _clock) = setup();
    add_user(&mut services, "alice", "Alice");
    let book = add_book(&mut services, "A Wizard of Earthsea", 4);

    let before = available(&services, &book);
    services.loans().borrow("alice", &book).unwrap();
    services.loans().return_book("alice", &book).unwrap();

    assert_eq!(available(&services, &book), before);
    assert_eq!(services.loans().loan_count("alice").unwrap(), 0);
    assert!(services.loans().get_user_loans("alice").unwrap().is_empty());
    assert!(matches!(
        services.loans().return_book("alice", &book),
        Err(AppError::NotOnLoan(_))
    ));
}

#[test]
fn test_no_double_loan() {
    let (mut services, _clock) = setup();
    add_user(&mut services, "alice", "Alice");
    let book = add_book(&mut services, "The Lathe of Heaven", 2);

    services.loans().borrow("alice", &book).unwrap();
    assert!(matches!(
        services.loans().borrow("alice", &book),
        Err(AppError::AlreadyBorrowed(_))
    ));
    assert_eq!(services.loans().loan_count("alice").unwrap(), 1);
    assert_eq!(available(&services, &book), 1);
}

#[test]
fn test_overdue_report() {
    let (mut services, clock) = setup();
    add_user(&mut services, "alice", "Alice");
    add_user(&mut services, "bob", "Bob");
    let short = add_book(&mut services, "Tehanu", 1);
    let long = add_book(&mut services, "The Word for World Is Forest", 1);

    let due = services.loans().borrow_for("alice", &short, 3).unwrap();
    services.loans().borrow_for("bob", &long, 30).unwrap();
    assert!(services.loans().overdue_loans().unwrap().is_empty());

    clock.advance(5);
    let overdue = services.loans().overdue_loans().unwrap();
    assert_eq!(overdue.len(), 1);

    let report: Value = serde_json::to_value(&overdue).unwrap();
    assert_eq!(
        report,
        json!([{
            "username": "alice",
            "firstname": "Alice",
            "book_id": short.to_string(),
            "due_date": due,
        }])
    );
}

#[test]
fn test_reducing_copies_does_not_touch_availability() {
    let (mut services, _clock) = setup();
    add_user(&mut services, "alice", "Alice");
    let book = add_book(&mut services, "Lavinia", 3);
    services.loans().borrow("alice", &book).unwrap();

    let updated = services
        .catalog()
        .update_book(
            &book,
            UpdateBook {
                num_copies: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.num_copies, 1);
    assert_eq!(updated.available_copies(), 2);
}

#[test]
fn test_registry_lookups() {
    let (mut services, _clock) = setup();
    add_user(&mut services, "sam_g", "Sam");
    add_user(&mut services, "sam_w", "Sam");
    add_book(&mut services, "Always Coming Home", 1);
    add_book(&mut services, "Searoad", 1);

    assert!(matches!(
        services.users().remove_user("sam"),
        Err(AppError::AmbiguousMatch(_))
    ));
    assert_eq!(services.users().count_users(), 2);
    assert!(matches!(
        services.users().get_user("frodo"),
        Err(AppError::NotFound(_))
    ));

    let found = services.catalog().search_books(&BookQuery::Title("home".to_string()));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Always Coming Home");

    let by_date = services.catalog().search_books(&BookQuery::PublicationDate(
        NaiveDate::from_ymd_opt(1969, 3, 1).unwrap(),
    ));
    assert_eq!(by_date.len(), 2);

    services.catalog().remove_book("SEAROAD").unwrap();
    assert_eq!(services.catalog().count_books(), 1);

    let listed = services.catalog().list_books();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Always Coming Home");
    assert_eq!(listed[0].available_copies, 1);

    let usernames: Vec<String> = services
        .users()
        .list_users()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(usernames, vec!["sam_g", "sam_w"]);
}
