#![allow(dead_code)]

use std::fmt::Write;

use itertools::Itertools;

use classy::analysis::{ClassDef, Definitions, SemaResult};
use classy::parse::{parse_file, ParserError};
use classy::source::{Source, SourceBuffer};
use classy::syntax::Sexpr;

pub fn parse(filename: &str, code: &str) -> Result<Vec<Sexpr>, ParserError> {
    let mut source_buf = SourceBuffer::new();
    let mut source = Source::new(&mut source_buf);
    let source_id = source.load_from_string(filename.into(), code.to_owned());
    let source_file = source.get(source_id).unwrap();

    parse_file(source_file)
}

pub fn define(code: &str) -> SemaResult<Definitions> {
    Definitions::from_program(parse("test.cls", code).unwrap())
}

pub fn define_ok(code: &str) -> Definitions {
    match define(code) {
        Ok(definitions) => definitions,
        Err(e) => panic!("definitions failed: {}", e),
    }
}

pub fn describe_class(class: &ClassDef) -> String {
    let mut out = String::new();

    if let Some(params) = class.template_params() {
        writeln!(out, "tclass {} ({})", class.name(), params.iter().join(" ")).unwrap();

        return out;
    }

    let header = match class.superclass() {
        Some(superclass) => format!("class {} inherits {}", class.name(), superclass.name()),
        None => format!("class {}", class.name()),
    };
    writeln!(out, "{}", header).unwrap();

    for field in class.fields() {
        let value = field.value.as_ref().unwrap();
        writeln!(out, "  field {} {} = {}", field.ty, field.name, value).unwrap();
    }

    for method in class.methods() {
        let params = method
            .params
            .iter()
            .map(|param| format!("({} {})", param.ty, param.name))
            .join(" ");
        writeln!(out, "  method {} {}({})", method.return_type, method.name, params).unwrap();
    }

    out
}

pub fn describe(definitions: &Definitions) -> String {
    definitions
        .classes()
        .map(|class| describe_class(class))
        .collect()
}
