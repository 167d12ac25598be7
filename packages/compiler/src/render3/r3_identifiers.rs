//! Render3 Identifiers
//!
//! Corresponds to packages/compiler/src/render3/r3_identifiers.ts (subset).

use crate::output::output_ast::ExternalReference;

pub const CORE: &str = "@angular/core";

pub struct Identifiers;

impl Identifiers {
    fn make_ref(name: Option<&str>) -> ExternalReference {
        ExternalReference {
            module_name: Some(CORE.to_string()),
            name: name.map(|s| s.to_string()),
        }
    }

    pub fn core() -> ExternalReference {
        Self::make_ref(None)
    }

    pub fn define_component() -> ExternalReference {
        Self::make_ref(Some("ɵɵdefineComponent"))
    }

    pub fn declare_component() -> ExternalReference {
        Self::make_ref(Some("ɵɵngDeclareComponent"))
    }

    pub fn forward_ref() -> ExternalReference {
        Self::make_ref(Some("forwardRef"))
    }

    pub fn change_detection_strategy() -> ExternalReference {
        Self::make_ref(Some("ChangeDetectionStrategy"))
    }

    pub fn view_encapsulation() -> ExternalReference {
        Self::make_ref(Some("ViewEncapsulation"))
    }
}
