use crux_core::testing::AppTester;
use folio_core::capabilities::KvError;
use folio_core::{
    App, Effect, Event, Image, ImageId, Model, ToastKind, REMOVED_MESSAGE, SAVED_MESSAGE,
    SAVE_FAILED_MESSAGE,
};

fn loaded(app: &AppTester<App, Effect>) -> Model {
    let mut model = Model::default();
    app.update(
        Event::ManifestLoaded {
            images: (1..=3)
                .map(|id| {
                    Image::new(
                        id,
                        format!("photos/img{id}.jpg"),
                        format!("Portrait {id}"),
                        format!("img{id}.jpg"),
                        "portrait",
                    )
                })
                .collect(),
        },
        &mut model,
    );
    model
}

fn has_storage_effect(effects: &[Effect]) -> bool {
    effects.iter().any(|e| matches!(e, Effect::KeyValue(_)))
}

#[test]
fn started_reads_saved_images() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::Started, &mut model);
    assert!(has_storage_effect(&update.effects));
}

#[test]
fn toggle_saves_persists_and_notifies() {
    let app = AppTester::<App, Effect>::default();
    let mut model = loaded(&app);

    let update = app.update(Event::BookmarkToggled { id: ImageId(2) }, &mut model);
    assert!(has_storage_effect(&update.effects));
    assert!(update.effects.iter().any(|e| matches!(e, Effect::Render(_))));

    let view = app.view(&model);
    assert_eq!(view.saved_count, 1);
    assert!(view.cards[1].saved);
    assert!(!view.cards[0].saved);

    let toast = view.toast.unwrap();
    assert_eq!(toast.message, SAVED_MESSAGE);
    assert_eq!(toast.kind, ToastKind::Success);
    assert_eq!(toast.duration_ms, 3000);
}

#[test]
fn second_toggle_removes() {
    let app = AppTester::<App, Effect>::default();
    let mut model = loaded(&app);

    app.update(Event::BookmarkToggled { id: ImageId(2) }, &mut model);
    app.update(Event::BookmarkToggled { id: ImageId(2) }, &mut model);

    let view = app.view(&model);
    assert_eq!(view.saved_count, 0);
    assert_eq!(view.toast.unwrap().message, REMOVED_MESSAGE);

    app.update(Event::ToastDismissed, &mut model);
    assert!(app.view(&model).toast.is_none());
}

#[test]
fn unknown_image_is_not_saved() {
    let app = AppTester::<App, Effect>::default();
    let mut model = loaded(&app);

    let update = app.update(Event::BookmarkToggled { id: ImageId(99) }, &mut model);
    assert!(update.effects.is_empty());
    assert!(model.bookmarks.is_empty());
}

#[test]
fn stored_ids_mark_cards_as_saved() {
    let app = AppTester::<App, Effect>::default();
    let mut model = loaded(&app);

    let update = app.update(
        Event::BookmarksRead(Box::new(Ok(Some(b"[1, 3]".to_vec())))),
        &mut model,
    );
    assert!(!has_storage_effect(&update.effects));

    let saved: Vec<bool> = app.view(&model).cards.iter().map(|c| c.saved).collect();
    assert_eq!(saved, vec![true, false, true]);
}

#[test]
fn legacy_records_are_understood() {
    let app = AppTester::<App, Effect>::default();
    let mut model = loaded(&app);

    let legacy = br#"[{"url":"photos/img2.jpg","name":"img2.jpg","title":"Portrait 2","category":"portrait","id":2}]"#;
    app.update(
        Event::BookmarksRead(Box::new(Ok(Some(legacy.to_vec())))),
        &mut model,
    );

    assert!(model.bookmarks.contains(ImageId(2)));
}

#[test]
fn unreadable_or_missing_storage_starts_empty() {
    let app = AppTester::<App, Effect>::default();
    let mut model = loaded(&app);

    app.update(Event::BookmarksRead(Box::new(Ok(None))), &mut model);
    app.update(
        Event::BookmarksRead(Box::new(Ok(Some(b"{broken".to_vec())))),
        &mut model,
    );
    app.update(
        Event::BookmarksRead(Box::new(Err(KvError::storage("disk full")))),
        &mut model,
    );

    assert!(model.bookmarks.is_empty());
}

#[test]
fn read_completing_after_a_toggle_keeps_the_toggle() {
    let app = AppTester::<App, Effect>::default();
    let mut model = loaded(&app);

    app.update(Event::BookmarkToggled { id: ImageId(1) }, &mut model);
    let update = app.update(
        Event::BookmarksRead(Box::new(Ok(Some(b"[3]".to_vec())))),
        &mut model,
    );

    assert!(model.bookmarks.contains(ImageId(1)));
    assert!(model.bookmarks.contains(ImageId(3)));
    assert!(has_storage_effect(&update.effects));
    assert_eq!(model.bookmarks.encode().unwrap(), b"[1,3]".to_vec());
}

#[test]
fn restore_matching_memory_is_not_written_back() {
    let app = AppTester::<App, Effect>::default();
    let mut model = loaded(&app);

    app.update(Event::BookmarkToggled { id: ImageId(1) }, &mut model);
    let update = app.update(
        Event::BookmarksRead(Box::new(Ok(Some(b"[1, 2]".to_vec())))),
        &mut model,
    );

    assert!(!has_storage_effect(&update.effects));
    assert_eq!(model.bookmarks.len(), 2);
}

#[test]
fn restored_id_without_image_can_be_removed() {
    let app = AppTester::<App, Effect>::default();
    let mut model = loaded(&app);

    app.update(
        Event::BookmarksRead(Box::new(Ok(Some(b"[2, 42]".to_vec())))),
        &mut model,
    );
    assert_eq!(app.view(&model).saved_count, 2);

    let update = app.update(Event::BookmarkToggled { id: ImageId(42) }, &mut model);
    assert!(has_storage_effect(&update.effects));

    let view = app.view(&model);
    assert_eq!(view.saved_count, 1);
    assert_eq!(view.toast.unwrap().message, REMOVED_MESSAGE);
    assert!(!model.bookmarks.contains(ImageId(42)));
}

#[test]
fn failed_write_is_reported() {
    let app = AppTester::<App, Effect>::default();
    let mut model = loaded(&app);

    let update = app.update(Event::BookmarksWritten(Box::new(Ok(()))), &mut model);
    assert!(update.effects.is_empty());

    app.update(
        Event::BookmarksWritten(Box::new(Err(KvError::storage("quota")))),
        &mut model,
    );
    let toast = app.view(&model).toast.unwrap();
    assert_eq!(toast.message, SAVE_FAILED_MESSAGE);
    assert_eq!(toast.kind, ToastKind::Error);
}
