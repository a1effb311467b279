//! Article create/edit form.

use crate::api::{Article, ArticleDraft};
use crate::validation::{FieldName, FieldRules, Form, FormSchema, FormValues};

pub fn editor_schema() -> FormSchema {
    FormSchema::new()
        .field(FieldName::Title, FieldRules::new().required())
        .field(FieldName::Description, FieldRules::new().required())
        .field(FieldName::Body, FieldRules::new().required())
        .tags(FieldRules::new().required())
}

pub struct EditorForm {
    pub form: Form,
    /// Slug of the article being edited; `None` for a new one.
    slug: Option<String>,
}

impl EditorForm {
    /// Empty form for a new article.
    pub fn new() -> Self {
        Self {
            form: Form::new(editor_schema()),
            slug: None,
        }
    }

    /// Form prefilled from an existing article.
    pub fn for_article(article: &Article) -> Self {
        let mut values = FormValues::default();
        values.set(FieldName::Title, article.title.clone());
        values.set(FieldName::Description, article.description.clone());
        values.set(FieldName::Body, article.body.clone());
        values.set_tags(article.visible_tags().map(str::to_string).collect());

        Self {
            form: Form::new(editor_schema()).with_values(values),
            slug: Some(article.slug.clone()),
        }
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    pub(crate) fn draft(values: &FormValues) -> ArticleDraft {
        ArticleDraft {
            title: values.get(FieldName::Title).to_string(),
            description: values.get(FieldName::Description).to_string(),
            body: values.get(FieldName::Body).to_string(),
            tag_list: values.tags().to_vec(),
        }
    }
}

impl Default for EditorForm {
    fn default() -> Self {
        Self::new()
    }
}
