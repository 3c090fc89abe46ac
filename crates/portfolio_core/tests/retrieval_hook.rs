use portfolio_core::{
    sample_project, DocumentId, MemoryDocumentStore, ProjectPatch, ProjectQueryOptions,
    ProjectService, RetrievalHook, Retrieve, StepClock,
};

fn service(store: &MemoryDocumentStore) -> ProjectService<&MemoryDocumentStore, StepClock> {
    ProjectService::with_clock(store, "projects", StepClock::new(1, 1)).unwrap()
}

#[test]
fn list_hook_tracks_options_and_refetches_on_demand() {
    let store = MemoryDocumentStore::new();
    let service = service(&store);
    let first = service.create(&sample_project()).unwrap();

    let mut hook = RetrievalHook::mount(service.list_retriever(), ProjectQueryOptions::default());
    assert!(!hook.loading());
    assert_eq!(hook.error(), None);
    assert_eq!(hook.data().map(Vec::len), Some(1));

    let mut second_input = sample_project();
    second_input.featured = false;
    second_input.title = "Second".to_string();
    service.create(&second_input).unwrap();

    // Same options by value: no refetch, data is the earlier snapshot.
    assert!(!hook.set_input(ProjectQueryOptions::default()));
    assert_eq!(hook.data().map(Vec::len), Some(1));

    hook.refetch();
    assert_eq!(hook.data().map(Vec::len), Some(2));

    assert!(hook.set_input(ProjectQueryOptions {
        featured: Some(true),
        ..ProjectQueryOptions::default()
    }));
    let featured = hook.data().unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].id, first.id);
}

#[test]
fn list_hook_keeps_data_when_the_store_fails() {
    let store = MemoryDocumentStore::new();
    let service = service(&store);
    service.create(&sample_project()).unwrap();

    let mut hook = RetrievalHook::mount(service.list_retriever(), ProjectQueryOptions::default());
    store.set_outage(Some("network down"));
    hook.refetch();

    assert_eq!(hook.data().map(Vec::len), Some(1));
    assert!(hook.error().unwrap().contains("network down"));
    assert!(!hook.loading());

    store.set_outage(None);
    hook.refetch();
    assert_eq!(hook.error(), None);
}

#[test]
fn invalid_options_surface_as_error_message() {
    let store = MemoryDocumentStore::new();
    let service = service(&store);

    let hook = RetrievalHook::mount(
        service.list_retriever(),
        ProjectQueryOptions {
            order_by: Some("nope".to_string()),
            ..ProjectQueryOptions::default()
        },
    );
    assert!(hook.error().unwrap().contains("nope"));
    assert_eq!(hook.data(), None);
}

#[test]
fn by_id_hook_treats_missing_as_no_data() {
    let store = MemoryDocumentStore::new();
    let service = service(&store);
    let created = service.create(&sample_project()).unwrap();

    let mut hook = RetrievalHook::mount(service.by_id_retriever(), Some(created.id.clone()));
    assert_eq!(hook.data().map(|project| &project.id), Some(&created.id));

    assert!(hook.set_input(Some(DocumentId::from("unknown"))));
    assert_eq!(hook.data(), None);
    assert_eq!(hook.error(), None);

    assert!(hook.set_input(None));
    assert_eq!(hook.data(), None);
    assert!(!hook.loading());
}

#[test]
fn by_id_hook_sees_update_after_refetch() {
    let store = MemoryDocumentStore::new();
    let service = service(&store);
    let created = service.create(&sample_project()).unwrap();
    let mut hook = RetrievalHook::mount(service.by_id_retriever(), Some(created.id.clone()));

    service
        .update(
            &created.id,
            &ProjectPatch {
                title: Some("Renamed".to_string()),
                ..ProjectPatch::default()
            },
        )
        .unwrap();
    assert_eq!(hook.data().unwrap().title, created.title);

    hook.refetch();
    assert_eq!(hook.data().unwrap().title, "Renamed");
}

#[test]
fn out_of_order_completions_apply_only_the_latest_request() {
    let store = MemoryDocumentStore::new();
    let service = service(&store);
    let mut featured_input = sample_project();
    featured_input.title = "Featured".to_string();
    service.create(&featured_input).unwrap();
    let mut plain_input = sample_project();
    plain_input.title = "Plain".to_string();
    plain_input.featured = false;
    service.create(&plain_input).unwrap();

    let retriever = service.list_retriever();
    let (mut hook, initial) =
        RetrievalHook::mount_deferred(&retriever, ProjectQueryOptions::default());
    let all = hook.retriever().retrieve(hook.input());

    let only_featured = ProjectQueryOptions {
        featured: Some(true),
        ..ProjectQueryOptions::default()
    };
    let latest = hook.set_input_deferred(only_featured.clone()).unwrap();
    let featured = hook.retriever().retrieve(&only_featured);

    // The newer request resolves first; the older one arrives late.
    assert!(hook.complete(latest, featured));
    assert!(!hook.complete(initial, all));

    let titles: Vec<_> = hook
        .data()
        .unwrap()
        .iter()
        .map(|project| project.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Featured"]);
}
