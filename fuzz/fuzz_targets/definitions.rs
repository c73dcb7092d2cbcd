#![no_main]

use libfuzzer_sys::fuzz_target;

use classy::analysis::{check_has_main_class, Definitions, InstantiationCache};
use classy::parse::parse_file;
use classy::position::Position;
use classy::source::{Source, SourceBuffer};

fuzz_target!(|code: &str| {
    let mut source_buf = SourceBuffer::new();
    let mut source = Source::new(&mut source_buf);
    let source_id = source.load_from_string("fuzz-input.cls".into(), code.to_owned());
    let source_file = source.get(source_id).unwrap();

    let Ok(program) = parse_file(source_file) else { return };
    let Ok(definitions) = Definitions::from_program(program) else { return };
    let _ = check_has_main_class(&definitions);

    // every template gets instantiated with every plain type
    let cache = InstantiationCache::new();
    let args = definitions
        .registry()
        .iter()
        .filter(|ty| ty.arity() == 0)
        .map(|ty| ty.name().to_owned())
        .collect::<Vec<_>>();

    for class in definitions.classes().filter(|class| class.is_template()) {
        let Some(params) = class.template_params() else { continue };
        let type_sig = std::iter::once(class.name())
            .chain(args.iter().cycle().take(params.len()).map(String::as_str))
            .collect::<Vec<_>>()
            .join("@");

        let _ = cache.get_or_resolve(&definitions, &type_sig, Position::default());
    }
});
