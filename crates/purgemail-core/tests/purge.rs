//! Integration tests for listing, deletion and the purge pipeline.
//!
//! These tests use an in-memory mailbox in place of the Gmail API.

#![allow(clippy::unwrap_used)]

use std::num::NonZeroUsize;
use std::sync::Mutex;

use proptest::prelude::*;

use purgemail_core::{
    AbortStage, ApiError, Category, Confirm, Error, MAX_BATCH_DELETE, MailApi, MessageId,
    MessagePage, PurgeOptions, PurgeOutcome, chunk, delete_all, list_all, purge,
};

/// One scripted listing page, served when the request carries `cursor`.
struct Page {
    cursor: Option<&'static str>,
    ids: Vec<MessageId>,
    next: Option<&'static str>,
}

#[derive(Default)]
struct FakeMailbox {
    pages: Vec<Page>,
    fail_list_at: Option<&'static str>,
    revoked: bool,
    fail_delete_call: Option<usize>,
    list_calls: Mutex<Vec<(String, u32, Option<String>)>>,
    delete_calls: Mutex<Vec<(String, Vec<MessageId>)>>,
}

impl FakeMailbox {
    fn with_pages(pages: Vec<Page>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    fn list_calls(&self) -> Vec<(String, u32, Option<String>)> {
        self.list_calls.lock().unwrap().clone()
    }

    fn delete_sizes(&self) -> Vec<usize> {
        self.delete_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, ids)| ids.len())
            .collect()
    }
}

impl MailApi for FakeMailbox {
    async fn list_messages(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<MessagePage, ApiError> {
        self.list_calls.lock().unwrap().push((
            query.to_string(),
            max_results,
            page_token.map(str::to_string),
        ));

        if self.revoked {
            return Err(ApiError::Auth(purgemail_oauth::Error::NoRefreshToken));
        }
        if page_token.is_some() && page_token == self.fail_list_at {
            return Err(ApiError::Status {
                status: 500,
                message: "Backend Error".into(),
            });
        }

        let page = self
            .pages
            .iter()
            .find(|p| p.cursor == page_token)
            .unwrap();
        Ok(MessagePage {
            ids: page.ids.clone(),
            next_page_token: page.next.map(str::to_string),
        })
    }

    async fn batch_delete(&self, user_id: &str, ids: &[MessageId]) -> Result<(), ApiError> {
        let mut calls = self.delete_calls.lock().unwrap();
        calls.push((user_id.to_string(), ids.to_vec()));

        if Some(calls.len()) == self.fail_delete_call {
            return Err(ApiError::Status {
                status: 429,
                message: "Rate Limit Exceeded".into(),
            });
        }
        Ok(())
    }
}

fn ids(names: &[&str]) -> Vec<MessageId> {
    names.iter().map(|n| MessageId::new(*n)).collect()
}

fn numbered(count: usize) -> Vec<MessageId> {
    (1..=count).map(|n| MessageId::new(format!("id{n}"))).collect()
}

fn two_pages() -> Vec<Page> {
    vec![
        Page {
            cursor: None,
            ids: ids(&["a", "b"]),
            next: Some("p2"),
        },
        Page {
            cursor: Some("p2"),
            ids: ids(&["c"]),
            next: Some(""),
        },
    ]
}

/// Answers confirmations from a script and records what was asked.
struct ScriptedConfirm {
    answers: Vec<bool>,
    asked: Vec<String>,
}

impl ScriptedConfirm {
    fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().rev().copied().collect(),
            asked: Vec::new(),
        }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm_purge(&mut self, category: Category) -> bool {
        self.asked.push(format!("purge {category}"));
        self.answers.pop().unwrap()
    }

    fn confirm_delete(&mut self, category: Category, count: usize) -> bool {
        self.asked.push(format!("delete {count} from {category}"));
        self.answers.pop().unwrap()
    }
}

#[tokio::test]
async fn test_list_all_follows_cursor() {
    let mailbox = FakeMailbox::with_pages(two_pages());

    let found = list_all(&mailbox, "category:social", 500).await.unwrap();

    assert_eq!(found, ids(&["a", "b", "c"]));
    assert_eq!(
        mailbox.list_calls(),
        vec![
            ("category:social".to_string(), 500, None),
            ("category:social".to_string(), 500, Some("p2".to_string())),
        ]
    );
}

#[tokio::test]
async fn test_list_all_single_page_without_cursor() {
    let mailbox = FakeMailbox::with_pages(vec![Page {
        cursor: None,
        ids: ids(&["only"]),
        next: None,
    }]);

    let found = list_all(&mailbox, "category:forums", 500).await.unwrap();
    assert_eq!(found, ids(&["only"]));
    assert_eq!(mailbox.list_calls().len(), 1);
}

#[tokio::test]
async fn test_list_all_handles_many_pages() {
    let cursors: Vec<&'static str> = (0..2000)
        .map(|n| &*Box::leak(format!("c{n}").into_boxed_str()))
        .collect();
    let pages = (0..2000)
        .map(|n| Page {
            cursor: if n == 0 { None } else { Some(cursors[n - 1]) },
            ids: vec![MessageId::new(format!("m{n}"))],
            next: cursors.get(n).copied().filter(|_| n < 1999),
        })
        .collect();
    let mailbox = FakeMailbox::with_pages(pages);

    let found = list_all(&mailbox, "category:updates", 1).await.unwrap();
    assert_eq!(found.len(), 2000);
    assert_eq!(found[1999], MessageId::new("m1999"));
}

#[tokio::test]
async fn test_list_failure_on_second_page_aborts_before_deletion() {
    let mailbox = FakeMailbox {
        fail_list_at: Some("p2"),
        ..FakeMailbox::with_pages(two_pages())
    };

    let result = list_all(&mailbox, "category:social", 500).await;
    assert!(matches!(result, Err(Error::Listing(ApiError::Status { status: 500, .. }))));

    let mut confirm = ScriptedConfirm::new(&[true, true]);
    let result = purge(&mailbox, Category::Social, &mut confirm, &PurgeOptions::default()).await;

    assert!(matches!(result, Err(Error::Listing(_))));
    assert_eq!(confirm.asked, vec!["purge social"]);
    assert!(mailbox.delete_sizes().is_empty());
}

#[tokio::test]
async fn test_listing_without_token_is_an_authorization_failure() {
    let mailbox = FakeMailbox {
        revoked: true,
        ..FakeMailbox::with_pages(two_pages())
    };
    let mut confirm = ScriptedConfirm::new(&[true, true]);

    let result = purge(&mailbox, Category::Social, &mut confirm, &PurgeOptions::default()).await;

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        Error::Authorization(purgemail_oauth::Error::NoRefreshToken)
    ));
    assert!(err.to_string().starts_with("Authorization failed"), "{err}");
    assert!(mailbox.delete_sizes().is_empty());
}

#[tokio::test]
async fn test_delete_all_issues_one_call_per_chunk() {
    let mailbox = FakeMailbox::default();
    let all = numbered(2500);

    let deleted = delete_all(&mailbox, "me", &chunk(&all, MAX_BATCH_DELETE))
        .await
        .unwrap();

    assert_eq!(deleted, 2500);
    assert_eq!(mailbox.delete_sizes(), vec![1000, 1000, 500]);

    let calls = mailbox.delete_calls.lock().unwrap();
    assert!(calls.iter().all(|(user, _)| user == "me"));
    assert_eq!(calls[0].1[0], MessageId::new("id1"));
    assert_eq!(calls[2].1[499], MessageId::new("id2500"));
}

#[tokio::test]
async fn test_delete_failure_stops_remaining_chunks() {
    let mailbox = FakeMailbox {
        fail_delete_call: Some(2),
        ..FakeMailbox::default()
    };
    let all = numbered(2500);

    let result = delete_all(&mailbox, "me", &chunk(&all, MAX_BATCH_DELETE)).await;

    match result {
        Err(Error::Deletion {
            deleted,
            total,
            chunks_done,
            chunks_total,
            source: ApiError::Status { status: 429, .. },
        }) => {
            assert_eq!(deleted, 1000);
            assert_eq!(total, 2500);
            assert_eq!(chunks_done, 1);
            assert_eq!(chunks_total, 3);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(mailbox.delete_sizes(), vec![1000, 1000]);
}

#[tokio::test]
async fn test_deletion_error_reports_progress() {
    let mailbox = FakeMailbox {
        fail_delete_call: Some(3),
        ..FakeMailbox::default()
    };
    let all = numbered(2500);

    let err = delete_all(&mailbox, "me", &chunk(&all, MAX_BATCH_DELETE))
        .await
        .unwrap_err();
    let message = err.to_string();

    assert!(message.contains("2000 of 2500 messages"), "{message}");
    assert!(message.contains("2 of 3 chunks"), "{message}");
}

#[tokio::test]
async fn test_purge_deletes_everything_listed() {
    let mailbox = FakeMailbox::with_pages(two_pages());
    let mut confirm = ScriptedConfirm::new(&[true, true]);
    let options = PurgeOptions {
        chunk_size: NonZeroUsize::new(2).unwrap(),
        ..PurgeOptions::default()
    };

    let outcome = purge(&mailbox, Category::Promotions, &mut confirm, &options)
        .await
        .unwrap();

    assert_eq!(outcome, PurgeOutcome::Deleted(3));
    assert_eq!(
        confirm.asked,
        vec!["purge promotions", "delete 3 from promotions"]
    );
    assert_eq!(mailbox.list_calls()[0].0, "category:promotions");
    assert_eq!(mailbox.delete_sizes(), vec![2, 1]);
}

#[tokio::test]
async fn test_purge_declined_before_listing() {
    let mailbox = FakeMailbox::with_pages(two_pages());
    let mut confirm = ScriptedConfirm::new(&[false]);

    let outcome = purge(&mailbox, Category::Social, &mut confirm, &PurgeOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome, PurgeOutcome::Aborted(AbortStage::BeforeListing));
    assert!(mailbox.list_calls().is_empty());
}

#[tokio::test]
async fn test_purge_declined_before_deletion() {
    let mailbox = FakeMailbox::with_pages(two_pages());
    let mut confirm = ScriptedConfirm::new(&[true, false]);

    let outcome = purge(&mailbox, Category::Social, &mut confirm, &PurgeOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome, PurgeOutcome::Aborted(AbortStage::BeforeDeletion));
    assert_eq!(mailbox.list_calls().len(), 2);
    assert!(mailbox.delete_sizes().is_empty());
}

#[tokio::test]
async fn test_purge_of_empty_category_skips_second_prompt() {
    let mailbox = FakeMailbox::with_pages(vec![Page {
        cursor: None,
        ids: Vec::new(),
        next: None,
    }]);
    let mut confirm = ScriptedConfirm::new(&[true]);

    let outcome = purge(&mailbox, Category::Forums, &mut confirm, &PurgeOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome, PurgeOutcome::Empty);
    assert_eq!(confirm.asked.len(), 1);
    assert!(mailbox.delete_sizes().is_empty());
}

#[tokio::test]
async fn test_dry_run_never_deletes() {
    let mailbox = FakeMailbox::with_pages(two_pages());
    let mut confirm = ScriptedConfirm::new(&[true]);
    let options = PurgeOptions {
        dry_run: true,
        ..PurgeOptions::default()
    };

    let outcome = purge(&mailbox, Category::Updates, &mut confirm, &options)
        .await
        .unwrap();

    assert_eq!(outcome, PurgeOutcome::DryRun(3));
    assert!(mailbox.delete_sizes().is_empty());
}

proptest! {
    #[test]
    fn prop_deleted_ids_match_input_in_order(count in 0usize..3000, max in 1usize..1100) {
        let mailbox = FakeMailbox::default();
        let all = numbered(count);
        let chunks = chunk(&all, NonZeroUsize::new(max).unwrap());

        let deleted = tokio_test::block_on(delete_all(&mailbox, "me", &chunks)).unwrap();

        let calls = mailbox.delete_calls.lock().unwrap();
        let sent: Vec<MessageId> = calls.iter().flat_map(|(_, ids)| ids.clone()).collect();
        prop_assert_eq!(deleted, count);
        prop_assert_eq!(calls.len(), count.div_ceil(max));
        prop_assert_eq!(sent, all);
    }
}
