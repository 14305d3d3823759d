use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use iced::keyboard::key::Named;
use iced::keyboard::{Key, Modifiers};
use iced::widget::{button, column, container, image, mouse_area, row, rule, scrollable, text, Space};
use iced::{Color, Element, Length, Subscription, Task, Theme};

use photo_sorter::archive::{self, ExtractedArchive};
use photo_sorter::categories::CategoryId;
use photo_sorter::export::{self, CleanReport, CopyOutcome, ExportRun};
use photo_sorter::grid::{self, GridLayout};
use photo_sorter::photo::{Photo, PhotoId, Rotation};
use photo_sorter::selection::Selection;
use photo_sorter::session::{Session, View};
use photo_sorter::settings::{
    self, GRID_PADDING, GRID_SPACING, THUMBNAIL_BATCH_SIZE, THUMB_CELL, THUMB_DECODE_SIZE,
    THUMB_PADDING, THUMB_SIZE,
};
use photo_sorter::thumbnail::{self, Thumbnail};

use crate::gestures::GridGestures;
use crate::viewer::ViewerState;

const SIDEBAR_WIDTH: f32 = 220.0;
const LABEL_COLOR: Color = Color::from_rgb(0.5, 0.5, 0.55);

fn boot() -> (Sorter, Task<Message>) {
    (Sorter::default(), Task::none())
}

pub fn run() -> iced::Result {
    iced::application(boot, update, view)
        .title("Photo Sorter")
        .theme(theme)
        .subscription(subscription)
        .centered()
        .run()
}

#[derive(Default)]
struct Sorter {
    session: Session,
    /// Keeps the extracted files alive while their photos are in the session.
    archive: Option<Arc<ExtractedArchive>>,
    loading: bool,
    /// Bumped per archive so late results of an older one are dropped.
    generation: u64,
    view: View,
    selection: Selection,
    thumbnails: HashMap<PhotoId, Thumbnail>,
    /// Thumbnail handles with the photo's current rotation applied.
    handles: HashMap<PhotoId, image::Handle>,
    pending_thumbnails: Vec<(PhotoId, PathBuf)>,
    /// Set while photos are dragged out of the grid.
    dragging: bool,
    hover_target: Option<View>,
    drop_slot: Option<usize>,
    grid_scroll_y: f32,
    viewer: ViewerState,
    export: Option<ExportRun>,
    export_errors: Vec<String>,
    status: String,
}

#[derive(Debug, Clone)]
pub enum Message {
    OpenArchive,
    ArchivePicked(Option<PathBuf>),
    ArchiveLoaded(u64, Result<Arc<ExtractedArchive>, String>),
    ThumbnailBatchReady(u64, Vec<(PhotoId, Thumbnail)>),
    ShowView(View),
    NewCategory,
    DeleteCategory(CategoryId),
    // Grid gestures; the column count is the one the grid was drawn with
    GridClicked(Option<usize>, Modifiers, usize),
    DragStarted(usize),
    DragOver(usize),
    DroppedOnGrid(usize),
    HoverEntered(View),
    HoverLeft(View),
    PointerReleased,
    SelectAll,
    RotateSelection(i32),
    ReturnSelection,
    // Export
    Export,
    ExportDirPicked(Option<PathBuf>),
    ExportPrepared(Result<CleanReport, String>),
    ExportBatchDone(Vec<CopyOutcome>),
    CancelExport,
    DismissErrors,
    // Preview
    OpenPreview(usize),
    PreviewLoaded(PhotoId, Rotation, Option<(Vec<u8>, u32, u32)>),
    NextImage,
    PrevImage,
    BackToGrid,
    GridScrolled(f32),
    KeyEscape,
    KeyEnter,
    KeyLeft,
    KeyRight,
}

fn subscription(_state: &Sorter) -> Subscription<Message> {
    iced::event::listen_with(|event, _status, _window| match event {
        iced::Event::Keyboard(iced::keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            key_message(&key, modifiers)
        }
        iced::Event::Mouse(iced::mouse::Event::ButtonReleased(iced::mouse::Button::Left)) => {
            Some(Message::PointerReleased)
        }
        _ => None,
    })
}

fn key_message(key: &Key, modifiers: Modifiers) -> Option<Message> {
    match key {
        Key::Named(Named::ArrowLeft) => Some(Message::KeyLeft),
        Key::Named(Named::ArrowRight) => Some(Message::KeyRight),
        Key::Named(Named::Enter) => Some(Message::KeyEnter),
        Key::Named(Named::Escape) => Some(Message::KeyEscape),
        Key::Named(Named::Delete) => Some(Message::ReturnSelection),
        Key::Character(c) if c.eq_ignore_ascii_case("a") && modifiers.command() => {
            Some(Message::SelectAll)
        }
        Key::Character(c) if c.eq_ignore_ascii_case("r") => {
            let turns = if modifiers.shift() { -1 } else { 1 };
            Some(Message::RotateSelection(turns))
        }
        _ => None,
    }
}

fn update(state: &mut Sorter, message: Message) -> Task<Message> {
    match message {
        Message::OpenArchive => {
            return Task::perform(
                pick_archive(settings::load_last_archive_dir()),
                Message::ArchivePicked,
            );
        }
        Message::ArchivePicked(Some(path)) => {
            settings::save_last_archive_dir(&path);
            state.loading = true;
            state.generation += 1;
            state.status = format!("Extracting {}", path.display());
            let generation = state.generation;
            return Task::perform(
                async move {
                    archive::extract(&path)
                        .map(Arc::new)
                        .map_err(|e| e.to_string())
                },
                move |result| Message::ArchiveLoaded(generation, result),
            );
        }
        Message::ArchivePicked(None) => {}
        Message::ArchiveLoaded(generation, result) => {
            if generation != state.generation {
                return Task::none();
            }
            state.loading = false;
            match result {
                Ok(extracted) => {
                    let photos = extracted.photos().to_vec();
                    state.pending_thumbnails =
                        photos.iter().map(|p| (p.id, p.source_path.clone())).collect();
                    state.session.load(photos);
                    state.status = format!(
                        "{} photos from {}",
                        state.session.total_photos(),
                        extracted.source().display()
                    );
                    state.archive = Some(extracted);
                    state.thumbnails.clear();
                    state.handles.clear();
                    state.selection.reset();
                    state.view = View::Unsorted;
                    state.viewer.close();
                    state.export_errors.clear();
                    return load_next_batch(state);
                }
                Err(e) => {
                    log::warn!("Failed to open archive: {}", e);
                    state.status = e;
                }
            }
        }
        Message::ThumbnailBatchReady(generation, results) => {
            if generation != state.generation {
                return Task::none();
            }
            for (id, thumb) in results {
                state.thumbnails.insert(id, thumb);
                refresh_handle(state, id);
            }
            return load_next_batch(state);
        }
        Message::ShowView(view) => {
            if view != state.view && state.session.view_exists(view) {
                state.view = view;
                state.selection.reset();
                state.viewer.close();
                return scroll_grid_to(0.0);
            }
        }
        Message::NewCategory => {
            if state.archive.is_some() {
                state.session.create_category();
            }
        }
        Message::DeleteCategory(id) => {
            let returned = state.session.delete_category(id);
            state.status = format!(
                "Category {} deleted, {} photos back in Unsorted",
                id.number(),
                returned
            );
            if state.view == View::Category(id) {
                state.view = View::Unsorted;
            }
            state.selection.reset();
        }
        Message::GridClicked(index, modifiers, columns) => {
            let ids = state.session.sequence_ids(state.view);
            match index.and_then(|i| ids.get(i).map(|id| (i, *id))) {
                Some((i, _)) if modifiers.shift() => {
                    state.selection.select_range(&ids, i, columns);
                }
                Some((i, id)) if modifiers.command() => state.selection.ctrl_click(i, id),
                Some((i, id)) => state.selection.single_click(i, id),
                None => state.selection.clear(),
            }
        }
        Message::DragStarted(index) => {
            let ids = state.session.sequence_ids(state.view);
            if let Some(&id) = ids.get(index) {
                if !state.selection.is_selected(id) {
                    state.selection.single_click(index, id);
                }
                state.dragging = true;
                log::debug!("Dragging {} photos", state.selection.len());
            }
        }
        Message::DragOver(slot) => {
            state.drop_slot = Some(slot);
        }
        Message::DroppedOnGrid(slot) => {
            state.drop_slot = None;
            if let View::Category(category) = state.view {
                let ids = state.selection.ordered(&state.session.sequence_ids(state.view));
                if state.session.reorder(&ids, category, slot) {
                    log::debug!("Reordered {} photos to slot {}", ids.len(), slot);
                    state.selection.reset();
                }
            }
        }
        Message::HoverEntered(target) => {
            state.hover_target = Some(target);
        }
        // Exits can arrive after the neighbour's enter; only clear our own.
        Message::HoverLeft(target) => {
            if state.hover_target == Some(target) {
                state.hover_target = None;
            }
        }
        Message::PointerReleased => {
            state.drop_slot = None;
            if std::mem::take(&mut state.dragging) {
                if let Some(target) = state.hover_target {
                    move_selection(state, target);
                }
            }
        }
        Message::SelectAll => {
            if !state.viewer.is_open() {
                state.selection.add_all(state.session.sequence_ids(state.view));
            }
        }
        Message::RotateSelection(turns) => {
            let ids = target_ids(state);
            state.session.rotate(&ids, turns);
            for id in &ids {
                refresh_handle(state, *id);
            }
            return preload_preview(state);
        }
        Message::ReturnSelection => {
            if matches!(state.view, View::Category(_)) && !state.viewer.is_open() {
                move_selection(state, View::Unsorted);
            }
        }
        Message::Export => {
            if state.export.is_some() {
                return Task::none();
            }
            if state.session.export_plan().is_empty() {
                state.status = "Nothing to export: every category is empty".into();
                return Task::none();
            }
            return Task::perform(
                pick_export_dir(settings::load_last_export_dir()),
                Message::ExportDirPicked,
            );
        }
        Message::ExportDirPicked(Some(dir)) => {
            settings::save_last_export_dir(&dir);
            // The plan is a snapshot; sorting can go on while it is copied.
            let plan = state.session.export_plan();
            log::info!("Exporting {} photos to {}", plan.photo_count(), dir.display());
            state.export_errors.clear();
            state.export = Some(ExportRun::new(&plan, &dir));
            return Task::perform(
                async move { export::prepare_target(&dir).map_err(|e| e.to_string()) },
                Message::ExportPrepared,
            );
        }
        Message::ExportDirPicked(None) => {}
        Message::ExportPrepared(result) => {
            if let Some(run) = state.export.as_mut() {
                run.prepared(result);
            }
            return next_export_batch(state);
        }
        Message::ExportBatchDone(outcomes) => {
            if let Some(run) = state.export.as_mut() {
                run.record(outcomes);
            }
            return next_export_batch(state);
        }
        Message::CancelExport => {
            if let Some(run) = state.export.as_mut() {
                run.cancel();
            }
        }
        Message::DismissErrors => {
            state.export_errors.clear();
        }
        Message::OpenPreview(index) => {
            state.viewer.open_index(index);
            return preload_preview(state);
        }
        Message::PreviewLoaded(id, rotation, pixels) => match pixels {
            Some((rgba, w, h)) => {
                let keep = preview_neighbours(state);
                let handle = image::Handle::from_rgba(w, h, rgba);
                state.viewer.insert(id, rotation, handle, &keep);
            }
            None => log::warn!("Could not decode preview for {}", id),
        },
        Message::NextImage | Message::KeyRight => {
            if state.viewer.is_open() {
                let total = state.session.sequence_ids(state.view).len();
                state.viewer.next(total);
                return preload_preview(state);
            }
        }
        Message::PrevImage | Message::KeyLeft => {
            if state.viewer.is_open() {
                state.viewer.prev();
                return preload_preview(state);
            }
        }
        Message::BackToGrid => {
            state.viewer.close();
            return scroll_grid_to(state.grid_scroll_y);
        }
        Message::GridScrolled(y) => {
            state.grid_scroll_y = y;
        }
        Message::KeyEscape => {
            if state.viewer.is_open() {
                state.viewer.close();
                return scroll_grid_to(state.grid_scroll_y);
            } else if !state.export_errors.is_empty() {
                state.export_errors.clear();
            } else {
                state.selection.reset();
            }
        }
        Message::KeyEnter => {
            if !state.viewer.is_open() {
                if let Some(anchor) = state.selection.anchor() {
                    let ids = state.session.sequence_ids(state.view);
                    if ids.get(anchor).is_some_and(|id| state.selection.is_selected(*id)) {
                        state.viewer.open_index(anchor);
                        return preload_preview(state);
                    }
                }
            }
        }
    }
    Task::none()
}

/// Moves the selected photos of the current view to `target`.
fn move_selection(state: &mut Sorter, target: View) {
    if target == state.view {
        return;
    }
    let ids = state.selection.ordered(&state.session.sequence_ids(state.view));
    if ids.is_empty() {
        return;
    }
    let moved = match target {
        View::Unsorted => state.session.return_to_catalog(&ids),
        View::Category(category) => state.session.move_to_category(&ids, category, None),
    };
    log::debug!("Moved {} photos to {:?}", moved, target);
    // Indices shifted, so the anchor is meaningless now.
    state.selection.reset();
    let total = state.session.sequence_ids(state.view).len();
    state.viewer.clamp(total);
}

/// Photos a rotate applies to: the previewed one, or the selection.
fn target_ids(state: &Sorter) -> Vec<PhotoId> {
    let ids = state.session.sequence_ids(state.view);
    match state.viewer.current_index {
        Some(index) => ids.get(index).copied().into_iter().collect(),
        None => state.selection.ordered(&ids),
    }
}

fn refresh_handle(state: &mut Sorter, id: PhotoId) {
    let (Some(thumb), Some(photo)) = (state.thumbnails.get(&id), state.session.photo(id)) else {
        return;
    };
    let (rgba, w, h) = thumb.rotated(photo.rotation);
    state.handles.insert(id, image::Handle::from_rgba(w, h, rgba));
}

fn load_next_batch(state: &mut Sorter) -> Task<Message> {
    if state.pending_thumbnails.is_empty() {
        return Task::none();
    }

    let count = THUMBNAIL_BATCH_SIZE.min(state.pending_thumbnails.len());
    let batch: Vec<(PhotoId, PathBuf)> = state.pending_thumbnails.drain(..count).collect();
    let generation = state.generation;

    Task::perform(
        async move { thumbnail::generate_thumbnails_parallel(&batch, THUMB_DECODE_SIZE) },
        move |results| Message::ThumbnailBatchReady(generation, results),
    )
}

fn next_export_batch(state: &mut Sorter) -> Task<Message> {
    let Some(run) = state.export.as_mut() else {
        return Task::none();
    };
    let Some(batch) = run.next_batch() else {
        return finish_export(state);
    };
    let dir = run.dir().to_path_buf();
    let cancel = run.cancel_flag();
    Task::perform(
        async move { export::copy_batch(&batch, &dir, &cancel) },
        Message::ExportBatchDone,
    )
}

fn finish_export(state: &mut Sorter) -> Task<Message> {
    let Some(run) = state.export.take() else {
        return Task::none();
    };
    let report = run.finish();
    state.status = if report.succeeded() {
        format!("Export complete: {}", report.summary())
    } else {
        format!("Export failed: {}", report.summary())
    };
    state.export_errors = report.errors;
    Task::none()
}

fn preview_neighbours(state: &Sorter) -> Vec<PhotoId> {
    let ids = state.session.sequence_ids(state.view);
    let Some(idx) = state.viewer.current_index else {
        return Vec::new();
    };
    let lo = idx.saturating_sub(1);
    let hi = (idx + 1).min(ids.len().saturating_sub(1));
    ids.get(lo..=hi).map(<[PhotoId]>::to_vec).unwrap_or_default()
}

fn preload_preview(state: &Sorter) -> Task<Message> {
    let Some(_) = state.viewer.current_index else {
        return Task::none();
    };
    let tasks: Vec<Task<Message>> = preview_neighbours(state)
        .into_iter()
        .filter_map(|id| state.session.photo(id))
        .filter(|photo| state.viewer.cached(photo.id, photo.rotation).is_none())
        .map(|photo| {
            let (id, rotation, path) = (photo.id, photo.rotation, photo.source_path.clone());
            Task::perform(
                async move {
                    thumbnail::open_oriented(&path, rotation).map(|img| {
                        let (w, h) = img.dimensions();
                        (img.into_raw(), w, h)
                    })
                },
                move |pixels| Message::PreviewLoaded(id, rotation, pixels),
            )
        })
        .collect();
    if tasks.is_empty() {
        Task::none()
    } else {
        Task::batch(tasks)
    }
}

fn grid_scroll_id() -> iced::widget::Id {
    iced::widget::Id::new("grid")
}

fn scroll_grid_to(y: f32) -> Task<Message> {
    use iced::widget::operation::AbsoluteOffset;
    iced::widget::operation::scroll_to(
        grid_scroll_id(),
        AbsoluteOffset {
            x: None,
            y: Some(y.max(0.0)),
        },
    )
}

fn view(state: &Sorter) -> Element<'_, Message> {
    if let Some(index) = state.viewer.current_index {
        let ids = state.session.sequence_ids(state.view);
        if let Some(photo) = ids.get(index).and_then(|id| state.session.photo(*id)) {
            return viewer_view(state, photo, index, ids.len());
        }
    }

    let body = row![sidebar(state), rule::vertical(1), grid_area(state)].height(Length::Fill);
    let mut content = column![toolbar(state)];
    if !state.export_errors.is_empty() {
        content = content.push(export_errors_panel(&state.export_errors));
    }
    container(content.push(body)).into()
}

fn toolbar(state: &Sorter) -> Element<'_, Message> {
    let exporting = state.export.is_some();
    let has_archive = state.archive.is_some();
    let has_selection = !state.selection.is_empty();

    let mut items: Vec<Element<'_, Message>> = vec![
        button("Open Archive")
            .on_press_maybe((!exporting && !state.loading).then_some(Message::OpenArchive))
            .into(),
        button("New Category")
            .on_press_maybe(has_archive.then_some(Message::NewCategory))
            .into(),
        button("\u{27F2}")
            .on_press_maybe(has_selection.then_some(Message::RotateSelection(-1)))
            .into(),
        button("\u{27F3}")
            .on_press_maybe(has_selection.then_some(Message::RotateSelection(1)))
            .into(),
    ];

    if matches!(state.view, View::Category(_)) {
        items.push(
            button("Return to Unsorted")
                .on_press_maybe(has_selection.then_some(Message::ReturnSelection))
                .into(),
        );
    }

    match &state.export {
        Some(run) => {
            items.push(
                text(format!("Exporting {} / {}...", run.done(), run.total()))
                    .size(13)
                    .color(LABEL_COLOR)
                    .into(),
            );
            items.push(
                button("Cancel")
                    .on_press_maybe((!run.is_cancelled()).then_some(Message::CancelExport))
                    .style(button::danger)
                    .into(),
            );
        }
        None => items.push(
            button("Export")
                .on_press_maybe(has_archive.then_some(Message::Export))
                .into(),
        ),
    }

    if has_selection {
        items.push(
            text(format!("{} selected", state.selection.len()))
                .size(13)
                .color(LABEL_COLOR)
                .into(),
        );
    }
    items.push(Space::new().width(Length::Fill).into());
    items.push(text(&state.status).size(13).into());

    row(items)
        .spacing(10)
        .padding(10)
        .align_y(iced::Alignment::Center)
        .into()
}

fn export_errors_panel(errors: &[String]) -> Element<'_, Message> {
    let lines: Vec<Element<'_, Message>> = errors
        .iter()
        .map(|e| text(e).size(12).color(Color::from_rgb(0.9, 0.3, 0.3)).into())
        .collect();
    container(
        column![
            row![
                text(format!("{} files could not be exported", errors.len())).size(13),
                Space::new().width(Length::Fill),
                button("Dismiss").on_press(Message::DismissErrors).style(button::text),
            ],
            scrollable(column(lines).spacing(2)).height(Length::Shrink),
        ]
        .spacing(6)
        .padding(10),
    )
    .width(Length::Fill)
    .max_height(160.0)
    .style(container::bordered_box)
    .into()
}

fn sidebar(state: &Sorter) -> Element<'_, Message> {
    let mut entries: Vec<Element<'_, Message>> = vec![sidebar_entry(
        state,
        View::Unsorted,
        format!("Unsorted ({})", state.session.catalog().count()),
        None,
    )];
    for category in state.session.categories().get_all() {
        entries.push(sidebar_entry(
            state,
            View::Category(category.id),
            format!("{} ({})", category.name, category.len()),
            Some(Message::DeleteCategory(category.id)),
        ));
    }

    container(scrollable(column(entries).spacing(4).padding(8)).height(Length::Fill))
        .width(SIDEBAR_WIDTH)
        .height(Length::Fill)
        .into()
}

/// One sidebar row. It is also a drop target for dragged photos.
fn sidebar_entry(
    state: &Sorter,
    target: View,
    label: String,
    on_delete: Option<Message>,
) -> Element<'_, Message> {
    let active = state.view == target;
    let open = button(text(label).size(13))
        .on_press(Message::ShowView(target))
        .width(Length::Fill)
        .style(if active { button::primary } else { button::secondary });

    let mut entry = row![open].spacing(4);
    if let Some(delete) = on_delete {
        let allowed = state.export.is_none();
        entry = entry.push(
            button(text("\u{2715}").size(13))
                .on_press_maybe(allowed.then_some(delete))
                .style(button::text),
        );
    }

    let highlighted = state.dragging && state.hover_target == Some(target) && !active;
    let framed = container(entry).padding(2);
    let framed = if highlighted {
        framed.style(drop_target_style)
    } else {
        framed
    };

    mouse_area(framed)
        .on_enter(Message::HoverEntered(target))
        .on_exit(Message::HoverLeft(target))
        .into()
}

fn grid_area(state: &Sorter) -> Element<'_, Message> {
    if state.loading {
        return container(text("Extracting archive...")).center(Length::Fill).into();
    }
    if state.archive.is_none() {
        return container(text("Open a zip archive to start sorting"))
            .center(Length::Fill)
            .into();
    }
    let ids = state.session.sequence_ids(state.view);
    if ids.is_empty() {
        let hint = match state.view {
            View::Unsorted => "Every photo has been sorted",
            View::Category(_) => "Drag photos onto this category in the sidebar",
        };
        return container(text(hint).color(LABEL_COLOR))
            .center(Length::Fill)
            .into();
    }

    scrollable(thumbnail_grid(state, ids))
        .id(grid_scroll_id())
        .on_scroll(|vp| Message::GridScrolled(vp.absolute_offset().y))
        .height(Length::Fill)
        .width(Length::Fill)
        .into()
}

fn thumbnail_grid(state: &Sorter, ids: Vec<PhotoId>) -> Element<'_, Message> {
    let handles = &state.handles;
    let selection = &state.selection;
    let drop_slot = state.drop_slot.filter(|_| matches!(state.view, View::Category(_)));

    iced::widget::responsive(move |size| {
        let layout = GridLayout::for_width(size.width, THUMB_CELL, GRID_SPACING, GRID_PADDING);
        let columns = layout.columns;
        let count = ids.len();

        let rows: Vec<Element<Message>> = ids
            .chunks(columns)
            .enumerate()
            .map(|(row_idx, chunk)| {
                let items: Vec<Element<Message>> = chunk
                    .iter()
                    .enumerate()
                    .map(|(col_idx, id)| {
                        let index = grid::index_of(row_idx, col_idx, columns);
                        let picture: Element<'_, Message> = match handles.get(id) {
                            Some(handle) => image(handle.clone())
                                .width(THUMB_SIZE)
                                .height(THUMB_SIZE)
                                .content_fit(iced::ContentFit::Contain)
                                .into(),
                            None => container(Space::new())
                                .width(THUMB_SIZE)
                                .height(THUMB_SIZE)
                                .style(container::dark)
                                .into(),
                        };
                        let cell = container(picture).padding(THUMB_PADDING);
                        if drop_slot == Some(index) {
                            cell.style(drop_target_style).into()
                        } else if selection.is_selected(*id) {
                            cell.style(selected_thumb_style).into()
                        } else {
                            cell.into()
                        }
                    })
                    .collect();
                row(items).spacing(GRID_SPACING).into()
            })
            .collect();

        let grid = column(rows).spacing(GRID_SPACING).padding(GRID_PADDING);

        GridGestures::new(grid, move |p, modifiers| {
            Some(Message::GridClicked(layout.cell_at(p.x, p.y, count), modifiers, columns))
        })
        .on_right_click(move |p| layout.cell_at(p.x, p.y, count).map(Message::OpenPreview))
        .on_drag_start(move |p| layout.cell_at(p.x, p.y, count).map(Message::DragStarted))
        .on_drag_over(move |p| Some(Message::DragOver(layout.insertion_index(p.x, p.y, count))))
        .on_drop(move |p| Some(Message::DroppedOnGrid(layout.insertion_index(p.x, p.y, count))))
        .into()
    })
    .into()
}

fn selected_thumb_style(theme: &Theme) -> container::Style {
    let palette = theme.palette();
    container::Style {
        background: Some(iced::Background::Color(Color {
            a: 0.25,
            ..palette.primary
        })),
        border: iced::Border {
            color: palette.primary,
            width: 2.0,
            radius: 4.0.into(),
        },
        ..Default::default()
    }
}

fn drop_target_style(theme: &Theme) -> container::Style {
    let palette = theme.palette();
    container::Style {
        border: iced::Border {
            color: palette.success,
            width: 3.0,
            radius: 4.0.into(),
        },
        ..Default::default()
    }
}

fn viewer_view<'a>(
    state: &'a Sorter,
    photo: &'a Photo,
    index: usize,
    total: usize,
) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match state.viewer.cached(photo.id, photo.rotation) {
        Some(handle) => image(handle.clone())
            .content_fit(iced::ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => text("Loading...").color(LABEL_COLOR).into(),
    };

    let toolbar = row![
        button("Back").on_press(Message::BackToGrid),
        button("\u{27F2}").on_press(Message::RotateSelection(-1)),
        button("\u{27F3}").on_press(Message::RotateSelection(1)),
        Space::new().width(Length::Fill),
        text(format!("{} ({}/{})", photo.file_name, index + 1, total)).size(14),
    ]
    .spacing(10)
    .padding(10);

    let prev = button(text("\u{2039}").size(48))
        .on_press_maybe((index > 0).then_some(Message::PrevImage))
        .style(button::text);
    let next = button(text("\u{203A}").size(48))
        .on_press_maybe((index + 1 < total).then_some(Message::NextImage))
        .style(button::text);

    let body = row![
        container(prev).center_y(Length::Fill),
        container(picture).center(Length::Fill),
        container(next).center_y(Length::Fill),
    ]
    .height(Length::Fill);

    column![toolbar, body].into()
}

fn theme(_state: &Sorter) -> Theme {
    Theme::Dark
}

async fn pick_archive(start: Option<PathBuf>) -> Option<PathBuf> {
    let mut dialog = rfd::AsyncFileDialog::new()
        .set_title("Select a zip archive of photos")
        .add_filter("Zip archive", &["zip"]);
    if let Some(dir) = start {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_file().await.map(|handle| handle.path().to_path_buf())
}

async fn pick_export_dir(start: Option<PathBuf>) -> Option<PathBuf> {
    let mut dialog = rfd::AsyncFileDialog::new().set_title("Export categories to");
    if let Some(dir) = start {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_folder().await.map(|handle| handle.path().to_path_buf())
}
