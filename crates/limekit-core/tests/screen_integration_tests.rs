//! Screen controllers driven against in-memory gateways.
//!
//! These cover the full submit flow: validation, the attempt state machine,
//! the compound approve + unwrap and the debounced election check.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FakeElection, FakeLibrary, FakeToken, Ledger, OWNER};
use limekit_core::authorization::{message_hash, SignedAuthorization, SplitSignature};
use limekit_core::forms::{ElectionField, LibraryField};
use limekit_core::gateway::GatewayError;
use limekit_core::screens::{
    ElectionOperation, ElectionScreen, LibraryPage, LibraryScreen, ResultCheck, Screen,
    TokenOperation, TokenScreen,
};
use limekit_core::types::{Address, B256, Book, Leader, U256};
use limekit_core::view::{ScreenId, ViewSwitcher};
use limekit_core::{AttemptError, SubmitError, TxStatus};

const APPROVAL: u64 = 500_000_000_000_000;

fn ether(amount: &str) -> U256 {
    alloy_primitives::utils::parse_ether(amount).unwrap()
}

fn fill_add_book(screen: &LibraryScreen<FakeLibrary>, id: &str, name: &str, copies: &str) {
    screen.set_field(LibraryField::BookId, id);
    screen.set_field(LibraryField::BookName, name);
    screen.set_field(LibraryField::Copies, copies);
}

// ========== Library ==========

#[tokio::test]
async fn test_add_book_confirms_and_refreshes() {
    let gateway = Arc::new(FakeLibrary::new(Ledger::new()));
    let screen = LibraryScreen::new(gateway.clone());
    screen.mount().await.unwrap();
    assert!(screen.is_owner());

    fill_add_book(&screen, "1", "Dune", "3");
    let receipt = screen.submit().await.unwrap().expect("write page returns a receipt");

    let attempt = screen.attempt().snapshot();
    assert_eq!(attempt.status(), TxStatus::Confirmed);
    assert_eq!(attempt.hash(), Some(receipt.hash));
    assert!(attempt.pending_hash().is_none());
    assert!(attempt.error().is_none());

    assert_eq!(gateway.ledger.count("add_book"), 1);
    assert!(gateway.ledger.calls().contains(&"add_book(1,Dune,3)".to_string()));
    // Mount plus the refresh after confirmation.
    assert_eq!(gateway.ledger.count("customer_record"), 2);
    assert_eq!(screen.form(), Default::default());
}

#[tokio::test]
async fn test_pending_hash_visible_and_second_submit_rejected() {
    let gateway = Arc::new(FakeLibrary::new(Ledger::held()));
    let screen = Arc::new(LibraryScreen::new(gateway.clone()));
    fill_add_book(&screen, "1", "Dune", "3");

    let mut rx = screen.attempt().subscribe();
    let task = {
        let screen = Arc::clone(&screen);
        tokio::spawn(async move { screen.submit().await })
    };

    let pending = rx
        .wait_for(|attempt| attempt.pending_hash().is_some())
        .await
        .unwrap()
        .clone();
    assert_eq!(pending.status(), TxStatus::Pending);

    let second = screen.submit().await;
    assert!(matches!(second, Err(SubmitError::InFlight)));
    assert_eq!(gateway.ledger.count("add_book"), 1);

    gateway.ledger.release(1);
    let receipt = task.await.unwrap().unwrap().unwrap();
    assert_eq!(Some(receipt.hash), pending.pending_hash());
    assert_eq!(screen.attempt().status(), TxStatus::Confirmed);
}

#[tokio::test]
async fn test_revert_keeps_form_and_shows_message() {
    let gateway = Arc::new(FakeLibrary::new(Ledger::new()));
    gateway
        .ledger
        .fail("add_book", GatewayError::Revert("Book already exists".into()));
    let screen = LibraryScreen::new(gateway.clone());
    fill_add_book(&screen, "1", "Dune", "3");

    let err = screen.submit().await.unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Failed(AttemptError::ContractRevert(_))
    ));

    let attempt = screen.attempt().snapshot();
    assert_eq!(attempt.status(), TxStatus::Failed);
    assert!(attempt.hash().is_none());
    assert_eq!(attempt.error().unwrap().user_message(), "Book already exists");
    assert_eq!(screen.form().book_name, "Dune");

    // Editing the form clears the failure.
    screen.set_field(LibraryField::Copies, "4");
    assert_eq!(screen.attempt().status(), TxStatus::Idle);
}

#[tokio::test]
async fn test_mined_revert_fails_attempt() {
    let gateway = Arc::new(FakeLibrary::new(Ledger::new()).with_book(7, "Solaris", 1));
    gateway.ledger.revert_on_chain("borrow_book");
    let screen = LibraryScreen::new(gateway.clone());
    screen.switch_page(LibraryPage::BorrowBook);
    screen.set_field(LibraryField::BookId, "7");

    let err = screen.submit().await.unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Failed(AttemptError::ContractRevert(_))
    ));
    assert!(screen.attempt().snapshot().pending_hash().is_none());
}

#[tokio::test]
async fn test_rpc_error_is_network_failure() {
    let gateway = Arc::new(FakeLibrary::new(Ledger::new()));
    gateway
        .ledger
        .fail("return_book", GatewayError::Rpc("connection refused".into()));
    let screen = LibraryScreen::new(gateway.clone());
    screen.switch_page(LibraryPage::ReturnBook);
    screen.set_field(LibraryField::BookId, "2");

    let err = screen.submit().await.unwrap_err();
    assert!(matches!(err, SubmitError::Failed(AttemptError::Network(_))));
}

#[tokio::test]
async fn test_invalid_input_never_reaches_gateway() {
    let gateway = Arc::new(FakeLibrary::new(Ledger::new()));
    let screen = LibraryScreen::new(gateway.clone());
    screen.switch_page(LibraryPage::BorrowBook);
    screen.set_field(LibraryField::BookId, "abc");

    let err = screen.submit().await.unwrap_err();
    assert!(matches!(err, SubmitError::Failed(AttemptError::Validation(_))));
    assert_eq!(gateway.ledger.count("borrow_book"), 0);
    assert_eq!(screen.attempt().status(), TxStatus::Failed);
}

#[tokio::test]
async fn test_my_books_skips_missing_records() {
    let gateway = Arc::new(FakeLibrary::new(Ledger::new()).with_book(1, "Dune", 2));
    gateway.record.lock().unwrap().extend([1, 9]);
    let screen = LibraryScreen::new(gateway.clone());

    let books = screen.refresh_my_books().await.unwrap();
    assert_eq!(
        books,
        vec![Book {
            id: 1,
            name: "Dune".into(),
            copies: 2
        }]
    );
    assert_eq!(screen.my_books(), books);
}

#[tokio::test]
async fn test_check_book_page() {
    let gateway = Arc::new(FakeLibrary::new(Ledger::new()).with_book(3, "Hyperion", 5));
    let screen = LibraryScreen::new(gateway.clone());
    screen.switch_page(LibraryPage::CheckBook);

    screen.set_field(LibraryField::BookId, "3");
    assert!(screen.submit().await.unwrap().is_none());
    assert_eq!(screen.looked_up_book().unwrap().name, "Hyperion");

    screen.set_field(LibraryField::BookId, "4");
    screen.submit().await.unwrap();
    assert!(screen.looked_up_book().is_none());
    assert_eq!(screen.attempt().status(), TxStatus::Idle);
}

#[tokio::test]
async fn test_read_page_failure_reaches_attempt() {
    let gateway = Arc::new(FakeLibrary::new(Ledger::new()).with_book(3, "Hyperion", 5));
    let screen = LibraryScreen::new(gateway.clone());
    screen.switch_page(LibraryPage::CheckBook);
    screen.set_field(LibraryField::BookId, "3");

    gateway
        .ledger
        .fail("book", GatewayError::Rpc("connection refused".into()));
    let err = screen.submit().await.unwrap_err();
    assert!(matches!(err, SubmitError::Failed(AttemptError::Network(_))));

    let attempt = screen.attempt().snapshot();
    assert_eq!(attempt.status(), TxStatus::Failed);
    assert!(attempt
        .error()
        .unwrap()
        .user_message()
        .contains("connection refused"));
    assert!(screen.looked_up_book().is_none());

    screen.switch_page(LibraryPage::MyBooks);
    gateway
        .ledger
        .fail("customer_record", GatewayError::Rpc("timeout".into()));
    assert!(screen.submit().await.is_err());
    assert_eq!(screen.attempt().status(), TxStatus::Failed);
}

#[tokio::test]
async fn test_non_owner_pages() {
    let mut library = FakeLibrary::new(Ledger::new());
    library.owner = OWNER;
    let screen = LibraryScreen::new(Arc::new(library));
    screen.mount().await.unwrap();

    assert!(!screen.is_owner());
    let pages = screen.available_pages();
    assert!(!pages.contains(&LibraryPage::AddBook));
    assert!(pages.contains(&LibraryPage::BorrowBook));
    assert!(pages.contains(&LibraryPage::MyBooks));
}

#[tokio::test]
async fn test_switch_page_resets_attempt() {
    let gateway = Arc::new(FakeLibrary::new(Ledger::new()));
    let screen = LibraryScreen::new(gateway);
    screen.switch_page(LibraryPage::DeleteBook);
    let _ = screen.submit().await;
    assert_eq!(screen.attempt().status(), TxStatus::Failed);

    screen.switch_page(LibraryPage::AddCopies);
    assert_eq!(screen.attempt().status(), TxStatus::Idle);
    assert_eq!(screen.page(), LibraryPage::AddCopies);
}

// ========== Token ==========

#[tokio::test]
async fn test_unwrap_skips_approval_when_allowance_suffices() {
    let gateway = Arc::new(FakeToken::new(Ledger::new(), ether("10")));
    let screen = TokenScreen::new(gateway.clone(), U256::from(APPROVAL));
    screen.set_amount("1");

    screen.submit(TokenOperation::Unwrap).await.unwrap();
    assert_eq!(gateway.ledger.count("approve"), 0);
    assert_eq!(gateway.ledger.count("unwrap"), 1);
    assert_eq!(screen.attempt().status(), TxStatus::Confirmed);
    assert_eq!(screen.amount(), "");
}

#[tokio::test]
async fn test_unwrap_approves_first_when_short() {
    let gateway = Arc::new(FakeToken::new(Ledger::new(), U256::ZERO));
    let screen = TokenScreen::new(gateway.clone(), U256::from(APPROVAL));
    screen.set_amount("1");

    let receipt = screen.submit(TokenOperation::Unwrap).await.unwrap();

    let writes: Vec<_> = gateway
        .ledger
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("approve") || c.starts_with("unwrap"))
        .collect();
    assert_eq!(
        writes,
        vec![
            format!("approve({})", ether("1")),
            format!("unwrap({})", ether("1")),
        ]
    );
    // The attempt ends on the unwrap, not the approval.
    assert_eq!(screen.attempt().snapshot().hash(), Some(receipt.hash));
}

#[tokio::test]
async fn test_small_unwrap_approves_configured_minimum() {
    let gateway = Arc::new(FakeToken::new(Ledger::new(), U256::ZERO));
    let screen = TokenScreen::new(gateway.clone(), U256::from(APPROVAL));
    screen.set_amount("0.0001");

    screen.submit(TokenOperation::Unwrap).await.unwrap();
    assert!(gateway
        .ledger
        .calls()
        .contains(&format!("approve({APPROVAL})")));
}

#[tokio::test]
async fn test_approval_failure_stops_unwrap() {
    let gateway = Arc::new(FakeToken::new(Ledger::new(), U256::ZERO));
    gateway
        .ledger
        .fail("approve", GatewayError::Revert("ERC20: approve denied".into()));
    let screen = TokenScreen::new(gateway.clone(), U256::from(APPROVAL));
    screen.set_amount("1");

    let err = screen.submit(TokenOperation::Unwrap).await.unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Failed(AttemptError::ContractRevert(_))
    ));
    assert_eq!(gateway.ledger.count("unwrap"), 0);
    assert_eq!(screen.attempt().status(), TxStatus::Failed);
    assert_eq!(screen.amount(), "1");
}

#[tokio::test]
async fn test_unwrap_stays_pending_across_approval() {
    let gateway = Arc::new(FakeToken::new(Ledger::held(), U256::ZERO));
    let screen = Arc::new(TokenScreen::new(gateway.clone(), U256::from(APPROVAL)));
    screen.set_amount("1");

    let mut rx = screen.attempt().subscribe();
    let task = {
        let screen = Arc::clone(&screen);
        tokio::spawn(async move { screen.submit(TokenOperation::Unwrap).await })
    };

    let approve_hash = rx
        .wait_for(|a| a.pending_hash().is_some())
        .await
        .unwrap()
        .pending_hash();
    gateway.ledger.release(1);

    let unwrap_hash = rx
        .wait_for(|a| a.pending_hash().is_some() && a.pending_hash() != approve_hash)
        .await
        .unwrap()
        .pending_hash();
    assert_eq!(screen.attempt().status(), TxStatus::Pending);
    assert!(matches!(
        screen.submit(TokenOperation::Wrap).await,
        Err(SubmitError::InFlight)
    ));

    gateway.ledger.release(1);
    let receipt = task.await.unwrap().unwrap();
    assert_eq!(Some(receipt.hash), unwrap_hash);
}

#[tokio::test]
async fn test_wrap_updates_balance() {
    let gateway = Arc::new(FakeToken::new(Ledger::new(), U256::ZERO));
    let screen = TokenScreen::new(gateway.clone(), U256::from(APPROVAL));
    screen.mount().await.unwrap();
    assert!(!screen.is_owner());
    assert!(!screen
        .available_operations()
        .contains(&TokenOperation::Withdraw));

    screen.set_amount("0.5");
    screen.submit(TokenOperation::Wrap).await.unwrap();
    assert_eq!(screen.balance(), Some(ether("0.5")));
}

#[tokio::test]
async fn test_wrap_with_signature_requires_authorization() {
    let gateway = Arc::new(FakeToken::new(Ledger::new(), U256::ZERO));
    let screen = TokenScreen::new(gateway.clone(), U256::from(APPROVAL));
    screen.set_amount("1");

    let err = screen
        .submit(TokenOperation::WrapWithSignature)
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::Failed(AttemptError::Validation(_))));
    assert_eq!(gateway.ledger.count("wrap_with_signature"), 0);

    let signer = Address::repeat_byte(0x41);
    let authorization = SignedAuthorization {
        message_hash: message_hash("Yes, I signed the message"),
        signature: SplitSignature {
            v: 27,
            r: B256::repeat_byte(1),
            s: B256::repeat_byte(2),
        },
        signer,
    };
    let screen =
        TokenScreen::new(gateway.clone(), U256::from(APPROVAL)).with_authorization(authorization);
    screen.set_amount("1");
    screen
        .submit(TokenOperation::WrapWithSignature)
        .await
        .unwrap();
    assert!(gateway
        .ledger
        .calls()
        .contains(&format!("wrap_with_signature({signer},27,{})", ether("1"))));
}

#[tokio::test]
async fn test_amount_edit_clears_failure() {
    let gateway = Arc::new(FakeToken::new(Ledger::new(), U256::ZERO));
    let screen = TokenScreen::new(gateway, U256::from(APPROVAL));
    screen.set_amount("0");
    assert!(screen.submit(TokenOperation::Wrap).await.is_err());
    assert_eq!(screen.attempt().status(), TxStatus::Failed);

    screen.set_amount("0.1");
    assert_eq!(screen.attempt().status(), TxStatus::Idle);
}

#[tokio::test]
async fn test_negative_amount_never_wraps() {
    let gateway = Arc::new(FakeToken::new(Ledger::new(), U256::ZERO));
    let screen = TokenScreen::new(gateway.clone(), U256::from(APPROVAL));

    for op in [TokenOperation::Wrap, TokenOperation::Unwrap] {
        screen.set_amount("-0.5");
        let err = screen.submit(op).await.unwrap_err();
        assert!(matches!(err, SubmitError::Failed(AttemptError::Validation(_))));
        assert_eq!(screen.attempt().status(), TxStatus::Failed);
    }
    assert_eq!(gateway.ledger.count("wrap"), 0);
    assert_eq!(gateway.ledger.count("unwrap"), 0);
    assert_eq!(gateway.ledger.count("allowance"), 0);
}

// ========== Election ==========

const DEBOUNCE: Duration = Duration::from_millis(500);

#[tokio::test(start_paused = true)]
async fn test_submitted_state_blocks_submit_after_debounce() {
    let gateway = Arc::new(FakeElection::new(Ledger::new()).with_submitted("Ohio"));
    let screen = ElectionScreen::new(gateway.clone(), DEBOUNCE);

    for partial in ["O", "Oh", "Ohi", "Ohio"] {
        screen.set_field(ElectionField::State, partial);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(gateway.ledger.count("results_submitted"), 0);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(gateway.ledger.count("results_submitted"), 1);
    assert!(gateway
        .ledger
        .calls()
        .contains(&"results_submitted(Ohio)".to_string()));
    assert_eq!(screen.result_check(), ResultCheck::AlreadySubmitted);

    screen.set_field(ElectionField::BidenVotes, "10");
    screen.set_field(ElectionField::TrumpVotes, "20");
    screen.set_field(ElectionField::Seats, "18");
    let err = screen
        .submit(ElectionOperation::SubmitResult)
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::Disabled(_)));
    assert_eq!(gateway.ledger.count("submit_state_result"), 0);
    assert_eq!(screen.attempt().status(), TxStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_clearing_state_cancels_check() {
    let gateway = Arc::new(FakeElection::new(Ledger::new()).with_submitted("Ohio"));
    let screen = ElectionScreen::new(gateway.clone(), DEBOUNCE);

    screen.set_field(ElectionField::State, "Ohio");
    tokio::time::sleep(Duration::from_millis(200)).await;
    screen.set_field(ElectionField::State, "");
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(gateway.ledger.count("results_submitted"), 0);
    assert_eq!(screen.result_check(), ResultCheck::Unchecked);
}

#[tokio::test(start_paused = true)]
async fn test_new_state_submits_and_refreshes_leader() {
    let gateway = Arc::new(FakeElection::new(Ledger::new()));
    let screen = ElectionScreen::new(gateway.clone(), DEBOUNCE);
    screen.mount().await.unwrap();
    assert_eq!(screen.leader(), Leader::Unknown);

    screen.set_field(ElectionField::State, "Texas");
    screen.set_field(ElectionField::BidenVotes, "5000");
    screen.set_field(ElectionField::TrumpVotes, "6000");
    screen.set_field(ElectionField::Seats, "38");
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(screen.result_check(), ResultCheck::Available);

    screen
        .submit(ElectionOperation::SubmitResult)
        .await
        .unwrap();
    assert!(gateway
        .ledger
        .calls()
        .contains(&"submit_state_result(Texas,5000,6000,38)".to_string()));
    assert_eq!(screen.leader(), Leader::Trump);
    assert_eq!(screen.form(), Default::default());
    assert_eq!(screen.result_check(), ResultCheck::Unchecked);
}

#[tokio::test]
async fn test_end_election_failure() {
    let gateway = Arc::new(FakeElection::new(Ledger::new()));
    gateway
        .ledger
        .fail("end_election", GatewayError::Revert(String::new()));
    let screen = ElectionScreen::new(gateway.clone(), DEBOUNCE);

    let err = screen
        .submit(ElectionOperation::EndElection)
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::Failed(_)));
    assert_eq!(
        screen.attempt().snapshot().error().unwrap().user_message(),
        "Unexpected error!"
    );
}

// ========== View switching ==========

#[tokio::test]
async fn test_leaving_screen_resets_it() {
    let library = Arc::new(LibraryScreen::new(Arc::new(FakeLibrary::new(Ledger::new()))));
    let token = Arc::new(TokenScreen::new(
        Arc::new(FakeToken::new(Ledger::new(), U256::ZERO)),
        U256::from(APPROVAL),
    ));
    let mut view = ViewSwitcher::new();
    view.register(ScreenId::Library, library.clone());
    view.register(ScreenId::Token, token.clone());

    view.switch_to(ScreenId::Library);
    library.set_field(LibraryField::BookId, "1");
    let _ = library.submit().await;
    assert_eq!(library.attempt().status(), TxStatus::Failed);

    view.switch_to(ScreenId::Token);
    assert_eq!(library.attempt().status(), TxStatus::Idle);
    assert_eq!(library.form(), Default::default());
    assert_eq!(view.active(), Some(ScreenId::Token));

    token.set_amount("2");
    token.reset();
    assert_eq!(token.amount(), "");
}
