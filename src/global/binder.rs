//! Lifecycle binder: wires consumer mount/render/unmount to counts and the sheet.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use tracing::debug;

use super::config::{BinderConfig, RemovalPolicy};
use super::descriptor::{GlobalStyle, RenderOutcome};
use super::tracker::{ReferenceTracker, Release, SharedTracker};
use crate::context::RenderContext;
use crate::error::GlobalStyleError;
use crate::identity::StyleId;
use crate::sheet::SharedStyleSheet;

static GLOBAL_BINDER: Lazy<LifecycleBinder> = Lazy::new(|| {
    LifecycleBinder::with_tracker(ReferenceTracker::global(), BinderConfig::from_env())
});

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Adds `sheet` to `sheets` unless the same sheet is already listed.
fn record_sheet(sheets: &mut Vec<SharedStyleSheet>, sheet: &SharedStyleSheet) {
    if !sheets.iter().any(|known| Arc::ptr_eq(known, sheet)) {
        sheets.push(Arc::clone(sheet));
    }
}

struct PendingRemoval {
    style: Arc<GlobalStyle>,
    sheets: Vec<SharedStyleSheet>,
}

struct BinderInner {
    tracker: SharedTracker,
    config: BinderConfig,
    /// Every sheet each identity has been rendered into since it was last removed.
    rendered: Mutex<HashMap<StyleId, Vec<SharedStyleSheet>>>,
    pending: Mutex<Vec<PendingRemoval>>,
}

impl BinderInner {
    fn restore_sheets(&self, id: &StyleId, sheets: Vec<SharedStyleSheet>) {
        let mut rendered = lock(&self.rendered);
        let known = rendered.entry(id.clone()).or_default();
        for sheet in &sheets {
            record_sheet(known, sheet);
        }
    }
}

/// Drives reference counts and sheet mutations from consumer lifecycle events.
///
/// A host integration calls three hooks per consumer:
///
/// - [`on_mount`](Self::on_mount) when the consumer is created
/// - [`on_render`](Self::on_render) on every render pass, with the sheet
///   reachable from that pass
/// - [`on_unmount`](Self::on_unmount) when the consumer is torn down
///
/// Every count change and every sheet call for an identity goes through
/// here, so the count is always updated before the sheet is touched.
/// The binder remembers each sheet an identity was rendered into, and the
/// last unmount clears the rules from all of them, whichever consumer
/// rendered them. Cloning is cheap; clones share the tracker, the
/// rendered sheets and pending removals.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use global_style::{
///     compile_template, share_sheet, BinderConfig, GlobalStyle, LifecycleBinder, MemorySheet,
///     Release, RenderContext, SharedStyleSheet,
/// };
///
/// let binder = LifecycleBinder::new(BinderConfig::default());
/// let style = Arc::new(GlobalStyle::new(compile_template("body { margin: 0; }").unwrap()));
/// let sheet = share_sheet(MemorySheet::new());
/// let port: SharedStyleSheet = sheet.clone();
///
/// binder.on_mount(style.id());
/// binder.on_render(&style, &RenderContext::default(), Some(&port)).unwrap();
/// assert_eq!(binder.on_unmount(&style), Release::Unreferenced);
/// assert!(sheet.lock().unwrap().is_empty());
/// ```
#[derive(Clone)]
pub struct LifecycleBinder {
    inner: Arc<BinderInner>,
}

impl LifecycleBinder {
    /// Creates a binder with its own, empty tracker.
    pub fn new(config: BinderConfig) -> Self {
        Self::with_tracker(ReferenceTracker::shared(), config)
    }

    /// Creates a binder over an existing tracker.
    pub fn with_tracker(tracker: SharedTracker, config: BinderConfig) -> Self {
        Self {
            inner: Arc::new(BinderInner {
                tracker,
                config,
                rendered: Mutex::new(HashMap::new()),
                pending: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Returns the process-wide binder over [`ReferenceTracker::global`],
    /// configured from the environment.
    pub fn global() -> Self {
        GLOBAL_BINDER.clone()
    }

    pub fn config(&self) -> &BinderConfig {
        &self.inner.config
    }

    pub fn tracker(&self) -> &SharedTracker {
        &self.inner.tracker
    }

    /// Returns the live-consumer count for `id`.
    pub fn count(&self, id: &StyleId) -> usize {
        lock(&self.inner.tracker).count(id)
    }

    /// Number of distinct sheets `id` currently has rules in, as far as
    /// this binder knows.
    pub fn rendered_sheets(&self, id: &StyleId) -> usize {
        lock(&self.inner.rendered).get(id).map_or(0, Vec::len)
    }

    /// Records a newly mounted consumer of `id`, returning the new count.
    ///
    /// Rendering is left to the next [`on_render`](Self::on_render), when
    /// the sheet and theme for that pass are known. Any removal still
    /// queued for `id` is cancelled, and its sheets are tracked again.
    pub fn on_mount(&self, id: &StyleId) -> usize {
        let count = lock(&self.inner.tracker).acquire(id);
        if count == 1 {
            let cancelled: Vec<PendingRemoval> = {
                let mut pending = lock(&self.inner.pending);
                let (cancelled, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut *pending)
                    .into_iter()
                    .partition(|p| p.style.id() == id);
                *pending = kept;
                cancelled
            };
            for removal in cancelled {
                debug!(%id, sheets = removal.sheets.len(), "cancelled queued removal");
                self.inner.restore_sheets(id, removal.sheets);
            }
        }
        debug!(%id, count, "mounted global style consumer");
        count
    }

    /// Renders `style` into the sheet reachable from this render pass.
    ///
    /// On success the sheet is remembered for `style`'s identity, so a
    /// later last unmount removes the rules from it.
    ///
    /// # Errors
    ///
    /// Returns [`GlobalStyleError::PortUnavailable`] when `sheet` is `None`,
    /// or [`GlobalStyleError::Interpolation`] when the rules can't be resolved.
    pub fn on_render(
        &self,
        style: &GlobalStyle,
        ctx: &RenderContext,
        sheet: Option<&SharedStyleSheet>,
    ) -> Result<RenderOutcome, GlobalStyleError> {
        let sheet = sheet.ok_or_else(|| GlobalStyleError::PortUnavailable {
            id: style.id().to_string(),
        })?;
        let outcome = style.render_styles(ctx, &mut *lock(sheet))?;

        let mut rendered = lock(&self.inner.rendered);
        record_sheet(rendered.entry(style.id().clone()).or_default(), sheet);
        Ok(outcome)
    }

    /// Records an unmounted consumer of `style`.
    ///
    /// When this drops the count to zero the rules are removed from every
    /// sheet the identity was rendered into, immediately or queued
    /// depending on [`BinderConfig::removal`]. It makes no difference
    /// whether this consumer rendered itself. Unmounts seen after the
    /// count already hit zero are ignored.
    pub fn on_unmount(&self, style: &Arc<GlobalStyle>) -> Release {
        let id = style.id();
        let release = lock(&self.inner.tracker).release(id);
        debug!(%id, ?release, "unmounted global style consumer");

        if release != Release::Unreferenced {
            return release;
        }
        let sheets = lock(&self.inner.rendered).remove(id).unwrap_or_default();
        if sheets.is_empty() {
            debug!(%id, "identity was never rendered; nothing to remove");
            return release;
        }

        match self.inner.config.removal {
            RemovalPolicy::Immediate => {
                for sheet in &sheets {
                    style.remove_styles(&mut *lock(sheet));
                }
            }
            RemovalPolicy::Deferred => {
                debug!(%id, sheets = sheets.len(), "queued removal");
                lock(&self.inner.pending).push(PendingRemoval {
                    style: Arc::clone(style),
                    sheets,
                });
            }
        }
        release
    }

    /// Carries out queued removals for identities still unreferenced.
    ///
    /// Hosts using [`RemovalPolicy::Deferred`] call this once per
    /// scheduling tick, after mounts for that tick have been processed.
    /// Returns how many identities were removed.
    pub fn flush_removals(&self) -> usize {
        let pending = std::mem::take(&mut *lock(&self.inner.pending));
        let mut removed = 0;
        for PendingRemoval { style, sheets } in pending {
            if self.count(style.id()) > 0 {
                self.inner.restore_sheets(style.id(), sheets);
                continue;
            }
            for sheet in &sheets {
                style.remove_styles(&mut *lock(sheet));
            }
            removed += 1;
        }
        removed
    }

    /// Number of removals waiting for [`flush_removals`](Self::flush_removals).
    pub fn pending_removals(&self) -> usize {
        lock(&self.inner.pending).len()
    }
}

impl std::fmt::Debug for LifecycleBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleBinder")
            .field("config", &self.inner.config)
            .field("rendered", &lock(&self.inner.rendered).len())
            .field("pending", &self.pending_removals())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::compile_template;
    use crate::sheet::{share_sheet, MemorySheet, StyleSheet};
    use crate::Theme;

    fn setup(policy: RemovalPolicy) -> (LifecycleBinder, Arc<GlobalStyle>, Arc<Mutex<MemorySheet>>) {
        let binder = LifecycleBinder::new(BinderConfig::new().with_removal(policy));
        let style = Arc::new(GlobalStyle::new(
            compile_template("body { color: {{ theme.fg }}; }").unwrap(),
        ));
        (binder, style, share_sheet(MemorySheet::new()))
    }

    fn red() -> RenderContext {
        RenderContext::new(Default::default(), Some(Theme::new().set("fg", "red")))
    }

    #[test]
    fn test_mount_render_unmount() {
        let (binder, style, sheet) = setup(RemovalPolicy::Immediate);
        let port: SharedStyleSheet = sheet.clone();

        assert_eq!(binder.on_mount(style.id()), 1);
        binder.on_render(&style, &red(), Some(&port)).unwrap();
        assert_eq!(binder.on_unmount(&style), Release::Unreferenced);

        let sheet = sheet.lock().unwrap();
        assert_eq!(binder.count(style.id()), 0);
        assert_eq!(sheet.remove_count(), 1);
        assert!(sheet.is_empty());
        assert_eq!(binder.rendered_sheets(style.id()), 0);
    }

    #[test]
    fn test_render_without_sheet() {
        let (binder, style, _) = setup(RemovalPolicy::Immediate);
        binder.on_mount(style.id());

        let err = binder.on_render(&style, &red(), None).unwrap_err();
        assert!(matches!(err, GlobalStyleError::PortUnavailable { .. }));
        assert_eq!(binder.rendered_sheets(style.id()), 0);
    }

    #[test]
    fn test_failed_render_records_no_sheet() {
        let (binder, style, sheet) = setup(RemovalPolicy::Immediate);
        let port: SharedStyleSheet = sheet.clone();
        binder.on_mount(style.id());

        let empty = RenderContext::new(Default::default(), Some(Theme::new()));
        assert!(binder.on_render(&style, &empty, Some(&port)).is_err());
        assert_eq!(binder.rendered_sheets(style.id()), 0);

        binder.on_unmount(&style);
        assert_eq!(sheet.lock().unwrap().remove_count(), 0);
    }

    #[test]
    fn test_duplicate_unmount_removes_once() {
        let (binder, style, sheet) = setup(RemovalPolicy::Immediate);
        let port: SharedStyleSheet = sheet.clone();

        binder.on_mount(style.id());
        binder.on_render(&style, &red(), Some(&port)).unwrap();
        binder.on_unmount(&style);
        assert_eq!(binder.on_unmount(&style), Release::AlreadyUnreferenced);

        assert_eq!(sheet.lock().unwrap().remove_count(), 1);
        assert_eq!(binder.count(style.id()), 0);
    }

    #[test]
    fn test_unmount_of_never_rendered_identity_touches_nothing() {
        let (binder, style, sheet) = setup(RemovalPolicy::Immediate);
        binder.on_mount(style.id());
        assert_eq!(binder.on_unmount(&style), Release::Unreferenced);
        assert_eq!(sheet.lock().unwrap().remove_count(), 0);
    }

    #[test]
    fn test_last_unmount_by_consumer_that_never_rendered() {
        let (binder, style, sheet) = setup(RemovalPolicy::Immediate);
        let port: SharedStyleSheet = sheet.clone();

        // a renders, b never does; b leaves last
        binder.on_mount(style.id());
        binder.on_mount(style.id());
        binder.on_render(&style, &red(), Some(&port)).unwrap();
        assert_eq!(binder.on_unmount(&style), Release::Remaining(1));
        assert!(sheet.lock().unwrap().has_rules(style.id()));

        assert_eq!(binder.on_unmount(&style), Release::Unreferenced);
        let sheet = sheet.lock().unwrap();
        assert!(!sheet.has_rules(style.id()));
        assert_eq!(sheet.remove_count(), 1);
    }

    #[test]
    fn test_removal_covers_every_rendered_sheet() {
        let (binder, style, first) = setup(RemovalPolicy::Immediate);
        let second = share_sheet(MemorySheet::new());
        let first_port: SharedStyleSheet = first.clone();
        let second_port: SharedStyleSheet = second.clone();

        binder.on_mount(style.id());
        binder.on_mount(style.id());
        binder.on_render(&style, &red(), Some(&first_port)).unwrap();
        binder.on_render(&style, &red(), Some(&first_port)).unwrap();
        binder.on_render(&style, &red(), Some(&second_port)).unwrap();
        assert_eq!(binder.rendered_sheets(style.id()), 2);

        binder.on_unmount(&style);
        binder.on_unmount(&style);

        assert!(first.lock().unwrap().is_empty());
        assert!(second.lock().unwrap().is_empty());
        assert_eq!(first.lock().unwrap().remove_count(), 1);
    }

    #[test]
    fn test_deferred_removal_flushes() {
        let (binder, style, sheet) = setup(RemovalPolicy::Deferred);
        let port: SharedStyleSheet = sheet.clone();

        binder.on_mount(style.id());
        binder.on_render(&style, &red(), Some(&port)).unwrap();
        binder.on_unmount(&style);

        assert_eq!(binder.pending_removals(), 1);
        assert!(!sheet.lock().unwrap().is_empty());

        assert_eq!(binder.flush_removals(), 1);
        assert!(sheet.lock().unwrap().is_empty());
        assert_eq!(binder.pending_removals(), 0);
    }

    #[test]
    fn test_deferred_removal_by_consumer_that_never_rendered() {
        let (binder, style, sheet) = setup(RemovalPolicy::Deferred);
        let port: SharedStyleSheet = sheet.clone();

        binder.on_mount(style.id());
        binder.on_mount(style.id());
        binder.on_render(&style, &red(), Some(&port)).unwrap();
        binder.on_unmount(&style);
        binder.on_unmount(&style);

        assert_eq!(binder.pending_removals(), 1);
        assert_eq!(binder.flush_removals(), 1);
        assert!(!sheet.lock().unwrap().has_rules(style.id()));
    }

    #[test]
    fn test_deferred_removal_cancelled_by_remount() {
        let (binder, style, sheet) = setup(RemovalPolicy::Deferred);
        let port: SharedStyleSheet = sheet.clone();

        binder.on_mount(style.id());
        binder.on_render(&style, &red(), Some(&port)).unwrap();
        binder.on_unmount(&style);
        binder.on_mount(style.id());

        assert_eq!(binder.pending_removals(), 0);
        assert_eq!(binder.flush_removals(), 0);

        let sheet = sheet.lock().unwrap();
        assert_eq!(sheet.remove_count(), 0);
        assert_eq!(sheet.rules(style.id()), Some("body { color: red; }"));
    }

    #[test]
    fn test_cancelled_removal_keeps_sheets_tracked() {
        let (binder, style, sheet) = setup(RemovalPolicy::Deferred);
        let port: SharedStyleSheet = sheet.clone();

        binder.on_mount(style.id());
        binder.on_render(&style, &red(), Some(&port)).unwrap();
        binder.on_unmount(&style);

        // the remounted consumer never renders before leaving again
        binder.on_mount(style.id());
        assert_eq!(binder.rendered_sheets(style.id()), 1);
        binder.on_unmount(&style);

        assert_eq!(binder.flush_removals(), 1);
        assert!(sheet.lock().unwrap().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let (binder, style, sheet) = setup(RemovalPolicy::Immediate);
        let port: SharedStyleSheet = sheet.clone();
        let other = binder.clone();

        binder.on_mount(style.id());
        binder.on_render(&style, &red(), Some(&port)).unwrap();
        assert_eq!(other.count(style.id()), 1);
        assert_eq!(other.rendered_sheets(style.id()), 1);

        other.on_unmount(&style);
        assert!(sheet.lock().unwrap().is_empty());
    }
}
