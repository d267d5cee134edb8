use tracker_actor::{ActorEntity, FrameworkError, ResourceActor};

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Tally {
    id: String,
    label: String,
    hits: u32,
    limit: u32,
}

#[derive(Debug)]
struct TallyCreate {
    label: String,
    limit: u32,
}

#[derive(Debug)]
enum TallyAction {
    Hit,
}

#[derive(Debug, thiserror::Error)]
enum TallyError {
    #[error("limit must be positive")]
    ZeroLimit,
    #[error("tally {0} is full")]
    Full(String),
}

impl ActorEntity for Tally {
    type Id = String;
    type Create = TallyCreate;
    type Action = TallyAction;
    type ActionResult = bool;
    type Error = TallyError;

    fn from_create_params(id: String, params: TallyCreate) -> Result<Self, Self::Error> {
        if params.limit == 0 {
            return Err(TallyError::ZeroLimit);
        }
        Ok(Self {
            id,
            label: params.label,
            hits: 0,
            limit: params.limit,
        })
    }

    // Returns true only for the hit that fills the tally.
    fn handle_action(&mut self, action: TallyAction) -> Result<bool, Self::Error> {
        match action {
            TallyAction::Hit => {
                if self.hits == self.limit {
                    return Err(TallyError::Full(self.id.clone()));
                }
                self.hits += 1;
                Ok(self.hits == self.limit)
            }
        }
    }
}

fn tally(label: &str, limit: u32) -> TallyCreate {
    TallyCreate {
        label: label.into(),
        limit,
    }
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::<Tally>::new(10);
    let handle = tokio::spawn(actor.run());

    // 1. Create
    let created = client.create("t1".into(), tally("tacos", 2)).await.unwrap();
    assert_eq!(created.entity.hits, 0);
    assert!(created.replaced.is_none());

    // 2. Actions
    assert!(!client.perform_action("t1".into(), TallyAction::Hit).await.unwrap());
    assert!(client.perform_action("t1".into(), TallyAction::Hit).await.unwrap());

    // 3. Entity errors come back wrapped
    let err = client
        .perform_action("t1".into(), TallyAction::Hit)
        .await
        .unwrap_err();
    assert!(matches!(err, FrameworkError::EntityError(_)));

    // 4. Get
    let stored = client.get("t1".into()).await.unwrap().unwrap();
    assert_eq!(stored.hits, 2);

    // 5. Retain drops what fails the predicate
    let dropped = client.retain(|t: &Tally| t.label != "tacos").await.unwrap();
    assert_eq!(dropped, 1);
    assert!(client.get("t1".into()).await.unwrap().is_none());

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_create_overwrites_and_returns_replaced() {
    let (actor, client) = ResourceActor::<Tally>::new(10);
    tokio::spawn(actor.run());

    client.create("t1".into(), tally("first", 3)).await.unwrap();
    client
        .perform_action("t1".into(), TallyAction::Hit)
        .await
        .unwrap();

    let created = client.create("t1".into(), tally("second", 3)).await.unwrap();
    let replaced = created.replaced.expect("previous entity should be returned");
    assert_eq!(replaced.label, "first");
    assert_eq!(replaced.hits, 1);
    assert_eq!(created.entity.label, "second");
    assert_eq!(created.entity.hits, 0);
}

#[tokio::test]
async fn test_failed_create_leaves_table_untouched() {
    let (actor, client) = ResourceActor::<Tally>::new(10);
    tokio::spawn(actor.run());

    client.create("t1".into(), tally("kept", 1)).await.unwrap();
    let err = client.create("t1".into(), tally("bad", 0)).await.unwrap_err();
    assert!(matches!(err, FrameworkError::EntityError(_)));

    let stored = client.get("t1".into()).await.unwrap().unwrap();
    assert_eq!(stored.label, "kept");
}

#[tokio::test]
async fn test_action_on_missing_id_is_not_found() {
    let (actor, client) = ResourceActor::<Tally>::new(10);
    tokio::spawn(actor.run());

    let err = client
        .perform_action("ghost".into(), TallyAction::Hit)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(client.list(|_| true).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_and_retain_apply_predicates() {
    let (actor, client) = ResourceActor::<Tally>::new(10);
    tokio::spawn(actor.run());

    client.create("a".into(), tally("a", 1)).await.unwrap();
    client.create("b".into(), tally("b", 2)).await.unwrap();
    client.create("c".into(), tally("c", 1)).await.unwrap();
    client.perform_action("a".into(), TallyAction::Hit).await.unwrap();
    client.perform_action("c".into(), TallyAction::Hit).await.unwrap();

    let mut open: Vec<String> = client
        .list(|t: &Tally| t.hits < t.limit)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    open.sort();
    assert_eq!(open, vec!["b".to_string()]);

    let dropped = client.retain(|t: &Tally| t.hits < t.limit).await.unwrap();
    assert_eq!(dropped, 2);
    assert_eq!(client.list(|_| true).await.unwrap().len(), 1);
}

/// Concurrent hits on the same tally: exactly one caller observes the fill.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_actions_report_transition_once() {
    let (actor, client) = ResourceActor::<Tally>::new(64);
    tokio::spawn(actor.run());

    client.create("t".into(), tally("busy", 50)).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..50 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.perform_action("t".into(), TallyAction::Hit).await.unwrap()
        }));
    }

    let mut fills = 0;
    for handle in handles {
        if handle.await.unwrap() {
            fills += 1;
        }
    }
    assert_eq!(fills, 1);
    assert_eq!(client.get("t".into()).await.unwrap().unwrap().hits, 50);
}

#[tokio::test]
async fn test_requests_after_shutdown_fail_with_actor_closed() {
    let (actor, client) = ResourceActor::<Tally>::new(10);
    let other = client.clone();
    let handle = tokio::spawn(actor.run());
    handle.abort();
    let _ = handle.await;

    let err = other.get("t".into()).await.unwrap_err();
    assert!(matches!(err, FrameworkError::ActorClosed));
    drop(client);
}
