// this_file: src/session.rs

//! Generation session: the font pool, style flags and output format a user
//! has picked, plus the two actions (generate once, generate a batch).
//!
//! Results come back as [`Notice`] values for the front end to show.

use log::info;
use midashi_core::{
    ExportKind, FontPool, FontRasterizer, MidashiError, Palette, RenderRequest, SaveDialog,
    StyleFlags,
};
use midashi_render::{export, BatchPlan, BatchRenderer, Compositor};
use rand::Rng;
use std::fmt;
use std::path::PathBuf;

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
    /// Files written by the action, if any
    pub saved: Vec<PathBuf>,
}

impl Notice {
    fn new(level: NoticeLevel, title: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            message: message.into(),
            saved: Vec::new(),
        }
    }

    fn info(title: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, message)
    }

    fn with_saved(mut self, saved: Vec<PathBuf>) -> Self {
        self.saved = saved;
        self
    }

    pub fn is_failure(&self) -> bool {
        self.level != NoticeLevel::Info
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

impl From<&MidashiError> for Notice {
    fn from(err: &MidashiError) -> Self {
        let level = if err.is_precondition() {
            NoticeLevel::Warning
        } else {
            NoticeLevel::Error
        };
        match err {
            MidashiError::InvalidLength { .. } => {
                Notice::new(level, "Text length", err.to_string())
            }
            MidashiError::NoFontSelected => Notice::new(level, "No font selected", err.to_string()),
            MidashiError::FontLoad { path, .. } => Notice::new(
                level,
                "Font load error",
                format!("Failed to load {}", path.display()),
            ),
            other => Notice::new(level, "Export failed", other.to_string()),
        }
    }
}

/// Everything a user has set up between actions.
pub struct Session<R> {
    compositor: Compositor<R>,
    fonts: FontPool,
    style: StyleFlags,
    kind: ExportKind,
    palette: Palette,
}

impl<R: FontRasterizer> Session<R> {
    pub fn new(rasterizer: R) -> Self {
        Self {
            compositor: Compositor::new(rasterizer),
            fonts: FontPool::new(),
            style: StyleFlags::default(),
            kind: ExportKind::default(),
            palette: Palette::default(),
        }
    }

    pub fn fonts(&self) -> &FontPool {
        &self.fonts
    }

    pub fn style(&self) -> StyleFlags {
        self.style
    }

    pub fn set_style(&mut self, style: StyleFlags) {
        self.style = style;
    }

    pub fn kind(&self) -> ExportKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: ExportKind) {
        self.kind = kind;
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Ask the dialog for fonts and append them; extras past capacity are dropped.
    pub fn add_fonts<D: SaveDialog + ?Sized>(&mut self, dialog: &mut D) -> Notice {
        let picked = dialog.pick_fonts();
        let offered = picked.len();
        let accepted = self.fonts.extend(picked);
        if accepted < offered {
            info!(
                "Font pool full: kept {} of {} picked fonts",
                accepted, offered
            );
        }
        Notice::info("Fonts", format!("Fonts selected: {}", self.fonts.len()))
    }

    /// Snapshot the current settings for `text`.
    pub fn request(&self, text: &str) -> RenderRequest {
        RenderRequest::new(text, self.fonts.clone(), self.style).with_palette(self.palette)
    }

    /// Render once and save where the dialog says. `None` when the user cancels.
    pub fn generate_once<D, G>(&self, text: &str, dialog: &mut D, rng: &mut G) -> Option<Notice>
    where
        D: SaveDialog + ?Sized,
        G: Rng + ?Sized,
    {
        let request = self.request(text);
        let image = match self.compositor.render(&request, rng) {
            Ok(image) => image,
            Err(err) => return Some(Notice::from(&err)),
        };

        let path = dialog.pick_save_path(self.kind)?;
        match export(&image, self.kind, &path) {
            Ok(()) => Some(
                Notice::info("Done", format!("Saved:\n{}", path.display())).with_saved(vec![path]),
            ),
            Err(err) => Some(Notice::from(&err)),
        }
    }

    /// Render and save a batch into the folder the dialog returns.
    pub fn generate_batch<D, G>(&self, text: &str, dialog: &mut D, rng: &mut G) -> Option<Notice>
    where
        D: SaveDialog + ?Sized,
        G: Rng + ?Sized,
    {
        self.generate_batch_of(text, midashi_core::types::BATCH_SIZE, dialog, rng)
    }

    /// [`Self::generate_batch`] with an explicit count.
    pub fn generate_batch_of<D, G>(
        &self,
        text: &str,
        count: usize,
        dialog: &mut D,
        rng: &mut G,
    ) -> Option<Notice>
    where
        D: SaveDialog + ?Sized,
        G: Rng + ?Sized,
    {
        let request = self.request(text);
        if let Err(err) = request.validate() {
            return Some(Notice::from(&err));
        }

        let target = dialog.pick_batch_target(self.kind)?;
        let plan = match BatchPlan::from_target(&target, self.kind) {
            Ok(plan) => plan.with_count(count),
            Err(err) => return Some(Notice::from(&err)),
        };

        match BatchRenderer::new(&self.compositor).run(&request, &plan, rng) {
            Ok(report) => {
                let saved = report.saved_count();
                Some(
                    Notice::info("Done", format!("Saved {saved} files."))
                        .with_saved(report.saved),
                )
            }
            Err(err) => Some(Notice::from(&err)),
        }
    }
}
