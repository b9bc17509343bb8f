/// Splits `.properties` text into `(key, value)` pairs.
///
/// Blank lines and lines starting with `#` or `!` are skipped. The first `=`
/// or `:` separates key from value; a line without one is a key with an
/// empty value. Leading whitespace of a value is dropped, trailing whitespace
/// is kept.
pub(crate) fn parse(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(str::trim_start)
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .map(|line| match line.find(&['=', ':'][..]) {
            Some(index) => (
                line[..index].trim().to_owned(),
                line[index + 1..].trim_start().to_owned(),
            ),
            None => (line.trim_end().to_owned(), String::new()),
        })
        .collect()
}
