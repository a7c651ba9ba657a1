//! Public-surface tests: a caller-defined filter compiled through the
//! prelude, and the serialized shape handed to execution engines.

use serde_json::{Value as Json, json};
use sifter_core::{
    config::CompilerConfig,
    prelude::*,
    query::{CompileRequest, JoinSource},
};

///
/// BookFilter
///

#[derive(Default)]
struct BookFilter {
    title: Option<String>,
    pages: Option<u32>,
    author_name: Option<String>,
    genres: Option<Vec<&'static str>>,
    ops: Option<OperatorOverrides>,
}

impl QueryFilter for BookFilter {
    fn filter_model() -> FilterModel {
        FilterModel::builder("BookFilter")
            .field(FilterField::new("title", FieldShape::Text).operator(Operator::Like))
            .field(FilterField::new("pages", FieldShape::Uint).operator(Operator::LessThan))
            .field(FilterField::new("author_name", FieldShape::Text))
            .field(
                FilterField::new("genres", FieldShape::list(FieldShape::Text))
                    .path("genre")
                    .operator(Operator::In),
            )
            .field(FilterField::overrides("ops"))
            .build()
    }

    fn field_value(&self, field: &str) -> Value {
        match field {
            "title" => self.title.clone().into(),
            "pages" => self.pages.into(),
            "author_name" => self.author_name.clone().into(),
            "genres" => self.genres.clone().into(),
            "ops" => self.ops.clone().map_or(Value::Null, Value::from),
            _ => Value::Null,
        }
    }
}

fn library() -> SchemaRegistry {
    let author = EntityModel::builder("Author")
        .column("name", FieldKind::Text)
        .relation_many("books", "Book")
        .build();
    let book = EntityModel::builder("Book")
        .column("title", FieldKind::Text)
        .column("pages", FieldKind::Uint)
        .column("genre", FieldKind::Text)
        .relation("author", "Author")
        .build();

    let registry = SchemaRegistry::new()
        .with(author)
        .and_then(|r| r.with(book))
        .expect("register");
    registry.validate().expect("validate");

    registry
}

#[test]
fn caller_defined_filter_compiles_through_the_prelude() {
    let schema = library();
    let filter = BookFilter {
        title: Some("rust".to_string()),
        pages: Some(400),
        author_name: Some("Ferris".to_string()),
        genres: Some(vec!["systems", "web"]),
        ops: None,
    };

    let spec = QueryCompiler::new(&schema)
        .compile(&filter, "Book")
        .expect("compile");

    assert_eq!(spec.predicates().len(), 4);
    assert_eq!(spec.joins().len(), 1);
    assert_eq!(spec.joins()[0].association, "author");
    assert_eq!(spec.predicates()[2].column().path, "author.name");
    assert_eq!(spec.predicates()[3].column().path, "genre");
    assert!(matches!(
        spec.predicates()[2].column().source,
        JoinSource::Join(_)
    ));
}

#[test]
fn specification_serializes_for_execution_engines() {
    let schema = library();
    let filter = BookFilter {
        title: Some("rust".to_string()),
        author_name: Some("Ferris".to_string()),
        ..Default::default()
    };

    let spec = QueryCompiler::new(&schema)
        .compile_request(
            CompileRequest::new(&filter, "Book").sort(SortSpec::new().desc("pages")),
        )
        .expect("compile");
    let wire = serde_json::to_value(&spec).expect("serialize");

    assert_eq!(wire["entity"], json!("Book"));
    assert_eq!(
        wire["joins"][0],
        json!({
            "id": 0,
            "owning_type": "Book",
            "association": "author",
            "target": "Author",
            "kind": "Inner",
            "parent": "Root",
            "path": "author",
        })
    );
    assert_eq!(
        wire["predicates"][0],
        json!({
            "Compare": {
                "column": { "source": "Root", "name": "title", "path": "title" },
                "op": "Like",
                "value": { "Text": "%rust%" },
                "escape": "\\",
            }
        })
    );
    assert_eq!(wire["predicates"][1]["Compare"]["column"]["source"], json!({ "Join": 0 }));
    assert!(wire["predicates"][1]["Compare"].get("escape").is_none());
    assert_eq!(wire["order"][0]["direction"], json!("desc"));
}

#[test]
fn operator_overrides_switch_predicates_per_instance() {
    let schema = library();
    let compiler = QueryCompiler::new(&schema);

    let exact = BookFilter {
        title: Some("Rust".to_string()),
        ops: Some([("title", Operator::Equal)].into_iter().collect()),
        ..Default::default()
    };
    let fuzzy = BookFilter {
        title: Some("Rust".to_string()),
        ..Default::default()
    };

    let exact = serde_json::to_value(compiler.compile(&exact, "Book").expect("exact"))
        .expect("serialize");
    let fuzzy = serde_json::to_value(compiler.compile(&fuzzy, "Book").expect("fuzzy"))
        .expect("serialize");

    assert_eq!(exact["predicates"][0]["Compare"]["op"], Json::from("Eq"));
    assert_eq!(fuzzy["predicates"][0]["Compare"]["op"], Json::from("Like"));
}

#[test]
fn config_loads_from_toml() {
    let config = CompilerConfig::from_toml_str("like_escape = \"!\"\ndefault_page_size = 50")
        .expect("config");
    let schema = library();
    let filter = BookFilter {
        title: Some("100%".to_string()),
        ..Default::default()
    };

    let spec = QueryCompiler::new(&schema)
        .with_config(config)
        .compile(&filter, "Book")
        .expect("compile");

    let wire = serde_json::to_value(&spec).expect("serialize");
    assert_eq!(
        wire["predicates"][0]["Compare"]["value"],
        json!({ "Text": "%100!%%" })
    );
    assert_eq!(wire["predicates"][0]["Compare"]["escape"], json!("!"));
    let explain = spec.to_string();
    assert!(explain.contains("WHERE title LIKE '%100!%%' ESCAPE '!'"), "{explain}");
}
