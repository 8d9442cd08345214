pub mod catalog;
pub mod convert;
pub mod ddl;
pub mod describe;
pub mod dispatch;
pub mod measure;
pub mod notation;
mod pattern;
pub mod translate;
pub mod validate;

use wasm_bindgen::prelude::*;

use convert::DiagramMode;
use describe::{DescribeOptions, DescriptionFormat};
use dispatch::{Dispatcher, RenderError, Surface};
use validate::Validation;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Convert an ER description; `undefined` means show the raw text instead.
#[wasm_bindgen(js_name = "erToNotation")]
pub fn er_to_notation(description: &str) -> Option<String> {
    convert::to_notation(description, DiagramMode::Er)
}

/// Convert a relational description; `undefined` means show the raw text instead.
#[wasm_bindgen(js_name = "relationalToNotation")]
pub fn relational_to_notation(description: &str) -> Option<String> {
    convert::to_notation(description, DiagramMode::Relational)
}

#[wasm_bindgen(js_name = "sqlToAlgebra")]
pub fn sql_to_algebra(sql: &str) -> String {
    translate::sql_to_algebra(sql)
}

#[wasm_bindgen(js_name = "algebraToSql")]
pub fn algebra_to_sql(expression: &str) -> String {
    translate::algebra_to_sql(expression)
}

/// Return the notation ready for rendering, with a header added if it was
/// missing.
#[wasm_bindgen(js_name = "validateNotation")]
pub fn validate_notation(code: &str) -> Result<String, String> {
    let validation = validate::validate_notation(code).map_err(|e| e.to_string())?;
    if !validation.is_usable() {
        return Err(validation.message().to_string());
    }
    match validation {
        Validation::Corrected(corrected) => Ok(corrected),
        _ => Ok(code.to_string()),
    }
}

/// Describe SQL DDL as notation, a text report or a relational model.
#[wasm_bindgen(js_name = "describeDdl")]
pub fn describe_ddl(ddl: &str, format: Option<String>) -> Result<String, String> {
    let format = match format.as_deref() {
        Some(name) => {
            DescriptionFormat::from_str(name).ok_or_else(|| format!("Unknown format: {name}"))?
        }
        None => DescriptionFormat::default(),
    };
    let catalog = ddl::parse_ddl(ddl).map_err(|e| e.to_string())?;
    Ok(describe::describe(&catalog, format, DescribeOptions::default()))
}

/// Rendering surface backed by two JS callbacks.
struct JsSurface {
    render: js_sys::Function,
    show_text: js_sys::Function,
}

impl Surface for JsSurface {
    fn render_diagram(&mut self, notation: &str) -> Result<(), RenderError> {
        self.render
            .call1(&JsValue::NULL, &JsValue::from_str(notation))
            .map(|_| ())
            .map_err(|e| RenderError(e.as_string().unwrap_or_else(|| format!("{e:?}"))))
    }

    fn show_text(&mut self, text: &str) {
        if let Err(e) = self.show_text.call1(&JsValue::NULL, &JsValue::from_str(text)) {
            log::error!("text view callback failed: {e:?}");
        }
    }
}

/// A diagram container: renders through `render(notation)` and falls back
/// to `showText(text)`.
#[wasm_bindgen]
pub struct DiagramView {
    dispatcher: Dispatcher<JsSurface>,
}

#[wasm_bindgen]
impl DiagramView {
    #[wasm_bindgen(constructor)]
    pub fn new(render: js_sys::Function, show_text: js_sys::Function) -> DiagramView {
        DiagramView {
            dispatcher: Dispatcher::new(JsSurface { render, show_text }),
        }
    }

    /// Returns whether the diagram was rendered.
    pub fn show(&mut self, description: &str, mode: &str) -> Result<bool, String> {
        let mode = DiagramMode::from_str(mode).ok_or_else(|| format!("Unknown mode: {mode}"))?;
        Ok(matches!(
            self.dispatcher.show(description, mode),
            dispatch::Outcome::Rendered
        ))
    }

    pub fn retry(&mut self) -> bool {
        matches!(self.dispatcher.retry(), Some(dispatch::Outcome::Rendered))
    }

    #[wasm_bindgen(js_name = "viewAsText")]
    pub fn view_as_text(&mut self) -> bool {
        self.dispatcher.view_as_text()
    }

    #[wasm_bindgen(getter, js_name = "lastNotation")]
    pub fn last_notation(&self) -> Option<String> {
        self.dispatcher.last_notation().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_notation_export() {
        assert_eq!(validate_notation("A {\n}").unwrap(), "erDiagram\nA {\n}");
        assert_eq!(
            validate_notation("erDiagram\n"),
            Err("no entities found in the diagram".to_string())
        );
        let valid = "erDiagram\n    A {\n    }\n";
        assert_eq!(validate_notation(valid).unwrap(), valid);
    }

    #[test]
    fn test_describe_ddl_export() {
        let ddl = "CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR(40));";
        let notation = describe_ddl(ddl, None).unwrap();
        assert_eq!(notation, "erDiagram\n    users {\n        int id PK\n        varchar name NULL\n    }");

        let relational = describe_ddl(ddl, Some("relational".into())).unwrap();
        assert!(relational.contains("    name varchar(40) NULL"));

        assert!(describe_ddl(ddl, Some("svg".into())).is_err());
    }

    #[test]
    fn test_translation_exports() {
        assert_eq!(sql_to_algebra("select * from t"), "π all_columns (t)");
        assert_eq!(algebra_to_sql("t"), "SELECT * FROM t");
    }
}
