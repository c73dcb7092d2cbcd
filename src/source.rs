use std::fs;
use std::io::{self, Read};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use elsa::FrozenVec;
use serde::Serialize;

/// The path that makes [`Source::load`] read the standard input.
pub const STDIN_PATH: &str = "-";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(NonZeroUsize);

/// Owns the text of every loaded program file.
///
/// Files are only ever appended, so the text can be borrowed for `'buf` while more
/// files are loaded.
#[derive(Default)]
pub struct SourceBuffer(FrozenVec<String>);

impl SourceBuffer {
    pub fn new() -> Self {
        Self(FrozenVec::new())
    }
}

/// The program files, in the order they were given.
pub struct Source<'buf> {
    buf: &'buf SourceBuffer,
    files: Vec<SourceFile<'buf>>,
}

#[derive(Debug)]
pub struct SourceFile<'buf> {
    id: SourceId,
    path: PathBuf,
    text: &'buf str,
    /// Byte offsets at which each line starts.
    line_starts: Vec<usize>,
}

impl<'buf> Source<'buf> {
    pub fn new(buf: &'buf mut SourceBuffer) -> Self {
        // the &mut makes this the only Source appending to the buffer
        Self {
            buf: &*buf,
            files: Vec::new(),
        }
    }

    pub fn load_from_string(&mut self, path: PathBuf, text: String) -> SourceId {
        let idx = self.buf.0.len();
        let id = SourceId(NonZeroUsize::MIN.saturating_add(idx));

        self.buf.0.push(text);
        let text: &'buf str = &self.buf.0[idx];
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(offset, _)| offset + 1))
            .collect();

        self.files.push(SourceFile {
            id,
            path,
            text,
            line_starts,
        });

        id
    }

    /// Reads a program file, or the standard input if `path` is [`STDIN_PATH`].
    pub fn load(&mut self, path: PathBuf) -> io::Result<SourceId> {
        let text = if path.as_os_str() == STDIN_PATH {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;

            text
        } else {
            fs::read_to_string(&path)?
        };

        Ok(self.load_from_string(path, text))
    }

    pub fn get(&self, id: SourceId) -> Option<&SourceFile<'buf>> {
        self.files.get(usize::from(id.0) - 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile<'buf>> {
        self.files.iter()
    }
}

impl<'buf> SourceFile<'buf> {
    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &'buf str {
        self.text
    }

    /// Returns the text of a 1-based `line`, without the line terminator.
    pub fn line(&self, line: usize) -> Option<&'buf str> {
        let start = *self.line_starts.get(line.checked_sub(1)?)?;
        let end = self
            .line_starts
            .get(line)
            .map_or(self.text.len(), |&next| next - 1);

        Some(self.text[start..end].trim_end_matches('\r'))
    }
}
