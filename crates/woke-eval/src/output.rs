/// Lines printed by a running program.
#[derive(Debug, Default)]
pub(crate) struct Output {
    lines: Vec<String>,
    echo: bool,
}

impl Output {
    pub(crate) fn new(echo: bool) -> Self {
        Self {
            lines: Vec::new(),
            echo,
        }
    }

    pub(crate) fn emit(&mut self, line: impl Into<String>) {
        let line = line.into();
        if self.echo {
            println!("{line}");
        }
        self.lines.push(line);
    }

    pub(crate) fn lines(&self) -> &[String] {
        &self.lines
    }
}
