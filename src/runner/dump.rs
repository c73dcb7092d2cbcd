use std::io::{self, Write};

use itertools::Itertools;
use ron::ser::PrettyConfig;
use serde::Serialize;

use classy::analysis::{ClassDef, VariableDef};
use classy::syntax::Sexpr;

use super::config::DumpFormat;

fn write_ron(value: &impl Serialize, mut out: impl Write) -> io::Result<()> {
    let dumped = ron::ser::to_string_pretty(value, PrettyConfig::default())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    writeln!(out, "{}", dumped)
}

pub fn dump_programs(format: DumpFormat, programs: &[Vec<Sexpr>], mut out: impl Write) -> io::Result<()> {
    match format {
        DumpFormat::Summary => {
            for sexpr in programs.iter().flatten() {
                writeln!(out, "{}", sexpr)?;
            }

            Ok(())
        }

        DumpFormat::Debug => writeln!(out, "{:#?}", programs),
        DumpFormat::Ron => write_ron(&programs, out),
    }
}

fn format_param(param: &VariableDef) -> String {
    format!("({} {})", param.ty, param.name)
}

fn dump_class_summary(class: &ClassDef, mut out: impl Write) -> io::Result<()> {
    if let Some(params) = class.template_params() {
        return writeln!(out, "tclass {} ({})", class.name(), params.iter().join(" "));
    }

    match class.superclass() {
        Some(superclass) => writeln!(out, "class {} inherits {}", class.name(), superclass.name())?,
        None => writeln!(out, "class {}", class.name())?,
    }

    for field in class.fields() {
        match &field.value {
            Some(value) => writeln!(out, "  field {} {} = {}", field.ty, field.name, value)?,
            None => writeln!(out, "  field {} {}", field.ty, field.name)?,
        }
    }

    for method in class.methods() {
        writeln!(
            out,
            "  method {} {}({})",
            method.return_type,
            method.name,
            method.params.iter().map(format_param).join(" "),
        )?;
    }

    Ok(())
}

pub fn dump_classes(format: DumpFormat, classes: &[&ClassDef], mut out: impl Write) -> io::Result<()> {
    match format {
        DumpFormat::Summary => {
            for class in classes {
                dump_class_summary(class, &mut out)?;
            }

            Ok(())
        }

        DumpFormat::Debug => writeln!(out, "{:#?}", classes),
        DumpFormat::Ron => write_ron(&classes, out),
    }
}
