//! Tera-backed implementation of the view contract.
//!
//! Templates are embedded at compile time. They are registered without an
//! `.html` suffix, so tera does not autoescape: form input is escaped once on
//! the way in by the validation pipeline.

use anyhow::Context as _;
use libris_kernel::Views;
use serde_json::Value;
use tera::{Context, Tera};

const TEMPLATES: &[(&str, &str)] = &[
    ("layout", include_str!("../templates/layout.tera")),
    ("index", include_str!("../templates/index.tera")),
    ("error", include_str!("../templates/error.tera")),
    ("genre_list", include_str!("../templates/genre_list.tera")),
    ("genre_detail", include_str!("../templates/genre_detail.tera")),
    ("genre_form", include_str!("../templates/genre_form.tera")),
    ("genre_delete", include_str!("../templates/genre_delete.tera")),
    ("author_list", include_str!("../templates/author_list.tera")),
    ("author_detail", include_str!("../templates/author_detail.tera")),
    ("author_form", include_str!("../templates/author_form.tera")),
    ("author_delete", include_str!("../templates/author_delete.tera")),
    ("book_list", include_str!("../templates/book_list.tera")),
    ("book_detail", include_str!("../templates/book_detail.tera")),
    ("book_form", include_str!("../templates/book_form.tera")),
    ("book_delete", include_str!("../templates/book_delete.tera")),
    ("bookinstance_list", include_str!("../templates/bookinstance_list.tera")),
    ("bookinstance_detail", include_str!("../templates/bookinstance_detail.tera")),
    ("bookinstance_form", include_str!("../templates/bookinstance_form.tera")),
    ("bookinstance_delete", include_str!("../templates/bookinstance_delete.tera")),
];

pub struct TeraViews {
    tera: Tera,
}

impl TeraViews {
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())
            .context("failed to compile view templates")?;
        Ok(Self { tera })
    }
}

impl Views for TeraViews {
    fn render(&self, view: &str, data: &Value) -> anyhow::Result<String> {
        let context = Context::from_serialize(data)
            .with_context(|| format!("view '{view}' needs an object of named data"))?;
        self.tera
            .render(view, &context)
            .with_context(|| format!("failed to render view '{view}'"))
    }
}
