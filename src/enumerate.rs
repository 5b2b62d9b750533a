//! Input enumerator (C6): deterministically expands CLI argument tokens
//! into an ordered stream of file paths.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A single enumerated input, distinguishing an ordinary path from the
/// "hash stdin bytes" sentinel so downstream code can special-case it
/// (it uses the literal path `<stdin>` in the sink line and disables the
/// multi-process orchestrator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Path(PathBuf),
    StdinBytes,
}

/// Expand a directory into its files in per-directory sorted order, with
/// subdirectories entered in sorted order too.
///
/// Every file of a directory is yielded before any of its subdirectories
/// are descended into, matching `os.walk`'s files-then-subdirs semantics
/// (`examples/original_source/chunksum/utils.py`'s `sorted_walk`:
/// `for file in sorted(files): yield ...` followed by `dirs.sort()` and
/// recursion). A single flat, depth-first sort of all directory entries
/// together would instead interleave subdirectories among sibling files
/// by combined alphabetical position, which is not what that function
/// does.
pub fn walk_dir(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk_dir_into(dir, &mut files);
    files
}

fn walk_dir_into(dir: &Path, out: &mut Vec<PathBuf>) {
    let mut entries: Vec<_> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .collect();
    entries.sort_by(|a, b| a.file_name().cmp(b.file_name()));

    let mut subdirs = Vec::new();
    for entry in entries {
        if entry.file_type().is_file() {
            out.push(entry.into_path());
        } else if entry.file_type().is_dir() {
            subdirs.push(entry.into_path());
        }
    }
    for subdir in subdirs {
        walk_dir_into(&subdir, out);
    }
}

/// Expand one positional CLI argument into zero or more [`Input`]s.
///
/// - A directory recursively walks to its files.
/// - A regular file yields itself.
/// - The literal `-` yields [`Input::StdinBytes`].
pub fn expand_argument(arg: &str) -> Vec<Input> {
    if arg == "-" {
        return vec![Input::StdinBytes];
    }
    let path = Path::new(arg);
    if path.is_dir() {
        walk_dir(path).into_iter().map(Input::Path).collect()
    } else {
        vec![Input::Path(path.to_path_buf())]
    }
}

/// Read newline-terminated paths from `reader`, stripping the terminal
/// newline from each, as consumer mode (`-x`) does.
pub fn read_lines_from<R: BufRead>(reader: R) -> Vec<Input> {
    reader
        .lines()
        .map_while(Result::ok)
        .map(|line| Input::Path(PathBuf::from(line)))
        .collect()
}

/// Expand a full set of positional CLI arguments into the final ordered
/// stream of inputs, honoring directory-walk and stdin-bytes expansion.
/// Determinism here is load-bearing: the chunksums file is append-only
/// and resumption depends on a stable enumeration order.
pub fn enumerate_inputs(args: &[String]) -> Vec<Input> {
    args.iter().flat_map(|a| expand_argument(a)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    #[test]
    fn test_stdin_bytes_sentinel() {
        assert_eq!(expand_argument("-"), vec![Input::StdinBytes]);
    }

    #[test]
    fn test_regular_file_yields_itself() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, b"hi").unwrap();
        let result = expand_argument(file.to_str().unwrap());
        assert_eq!(result, vec![Input::Path(file)]);
    }

    #[test]
    fn test_directory_yields_sorted_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), b"b").unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        let result = expand_argument(dir.path().to_str().unwrap());
        let names: Vec<_> = result
            .into_iter()
            .map(|i| match i {
                Input::Path(p) => p.file_name().unwrap().to_string_lossy().into_owned(),
                Input::StdinBytes => panic!("unexpected sentinel"),
            })
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_files_yielded_before_subdirectories() {
        // z.txt and a_sub/m.txt: files-then-subdirs semantics yields the
        // top-level file before descending into the subdirectory, even
        // though "a_sub" sorts before "z.txt" alphabetically.
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("z.txt"), b"z").unwrap();
        let sub = dir.path().join("a_sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("m.txt"), b"m").unwrap();

        let result = expand_argument(dir.path().to_str().unwrap());
        let names: Vec<_> = result
            .into_iter()
            .map(|i| match i {
                Input::Path(p) => p.file_name().unwrap().to_string_lossy().into_owned(),
                Input::StdinBytes => panic!("unexpected sentinel"),
            })
            .collect();
        assert_eq!(names, vec!["z.txt", "m.txt"]);
    }

    #[test]
    fn test_read_lines_from_stdin() {
        let input = Cursor::new(b"one\ntwo\nthree\n".to_vec());
        let result = read_lines_from(input);
        assert_eq!(
            result,
            vec![
                Input::Path(PathBuf::from("one")),
                Input::Path(PathBuf::from("two")),
                Input::Path(PathBuf::from("three")),
            ]
        );
    }
}
