use crate::analysis::definitions::Definitions;
use crate::analysis::error::{SemaError, SemaResult};
use crate::position::HasPosition;

pub const MAIN_CLASS: &str = "main";
pub const MAIN_METHOD: &str = "main";

/// Checks that the program has an entry point: a plain class `main` that has (or inherits)
/// a method `main`.
pub fn check_has_main_class(definitions: &Definitions) -> SemaResult<()> {
    let Some(class) = definitions.classes().find(|class| class.name() == MAIN_CLASS) else {
        return Err(SemaError::ty(format!("no {} class found", MAIN_CLASS)));
    };

    if class.is_template() {
        return Err(
            SemaError::ty(format!("the {} class cannot be a template class", MAIN_CLASS))
                .at(class.pos()),
        );
    }

    if class.find_method(MAIN_METHOD).is_none() {
        return Err(SemaError::name(format!(
            "the {} class must define a method named {}",
            MAIN_CLASS, MAIN_METHOD
        ))
        .at(class.pos()));
    }

    Ok(())
}
