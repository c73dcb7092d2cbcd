use std::fmt::{self, Display};

use phf::phf_map;
use serde::Serialize;

macro_rules! keywords {
    ($( $lit:literal => $variant:ident ),+,) => { keywords!($( $lit => $variant ),+); };

    ($( $lit:literal => $variant:ident ),+) => {
        #[derive(Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
        pub enum Keyword {
            $( $variant ),+
        }

        impl Keyword {
            const KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
                $( $lit => Self::$variant ),+
            };

            pub fn parse(input: &str) -> Option<Keyword> {
                Self::KEYWORDS.get(input).copied()
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $lit ),+
                }
            }
        }
    };
}

keywords! {
    // declarations
    "class" => Class,
    "tclass" => TemplateClass,
    "inherits" => Inherits,
    "field" => Field,
    "method" => Method,
    "void" => Void,

    // literals
    "true" => True,
    "false" => False,
    "null" => Null,
}

impl Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
