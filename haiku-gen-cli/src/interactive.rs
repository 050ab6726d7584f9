use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use rand::Rng;

use haiku_gen_core::model::successor_table::SuccessorTable;
use haiku_gen_core::poem::resources::list_corpora;
use haiku_gen_core::{GenerationConfig, PoemError, ResourcePaths, Resources};

/// Line-oriented question/answer channel.
struct Prompt<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Prompt<I, O> {
    fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()
    }

    /// Next trimmed answer, or `None` once the input is closed.
    fn answer(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }
}

/// The question-and-answer flow of the bare `haiku-gen` command.
///
/// Invalid answers re-ask the question; closing stdin ends the session.
pub struct Session<'a> {
    resources: &'a Resources,
    config: &'a GenerationConfig,
    data_dir: &'a Path,
    paths: &'a ResourcePaths,
}

impl<'a> Session<'a> {
    pub fn new(resources: &'a Resources, config: &'a GenerationConfig, data_dir: &'a Path, paths: &'a ResourcePaths) -> Self {
        Self { resources, config, data_dir, paths }
    }

    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> io::Result<()> {
        let mut prompt = Prompt { input: io::stdin().lock(), output: io::stdout() };
        self.run_with(&mut prompt, rng)
    }

    fn run_with<I: BufRead, O: Write, R: Rng + ?Sized>(&self, prompt: &mut Prompt<I, O>, rng: &mut R) -> io::Result<()> {
        prompt.say("What type of poem would you like to generate? Freeform or haiku?")?;
        while let Some(answer) = prompt.answer()? {
            match answer.to_lowercase().as_str() {
                "haiku" => return self.haiku(prompt, rng),
                "freeform" => return self.freeform(prompt, rng),
                _ => prompt.say("Please enter either 'haiku' or 'freeform'")?,
            }
        }
        Ok(())
    }

    fn resolve_corpus(&self, answer: &str) -> PathBuf {
        let path = PathBuf::from(answer);
        if path.exists() { path } else { self.data_dir.join(path) }
    }

    fn haiku<I: BufRead, O: Write, R: Rng + ?Sized>(&self, prompt: &mut Prompt<I, O>, rng: &mut R) -> io::Result<()> {
        let default_corpus = self.paths.resolve(self.data_dir).default_corpus;

        prompt.say("Whose style of writing would you like to emulate?")?;
        prompt.say("Give the name of a text file that contains their writing.")?;
        if let Ok(corpora) = list_corpora(self.data_dir, self.paths) {
            for corpus in corpora.iter().filter_map(|path| path.file_name()) {
                prompt.say(&format!("  {}", corpus.to_string_lossy()))?;
            }
        }
        prompt.say("If you'd like to use the default file, just press enter.")?;

        let successors = loop {
            let Some(answer) = prompt.answer()? else { return Ok(()) };
            let path = if answer.is_empty() {
                prompt.say(&format!("Using {}.", default_corpus.display()))?;
                default_corpus.clone()
            } else {
                self.resolve_corpus(&answer)
            };

            match SuccessorTable::load(&path) {
                Ok(table) => break table,
                Err(e) => {
                    prompt.say(&format!("The file {} could not be used: {e}", path.display()))?;
                    prompt.say("Please enter the filename again.")?;
                }
            }
        };

        prompt.say("What word would you like the poem to begin with?")?;
        while let Some(word) = prompt.answer()? {
            match self.resources.haiku(&successors, &word, self.config, rng) {
                Ok(poem) => return prompt.say(&format!("\n{poem}")),
                Err(PoemError::UnknownStartWord(_)) => {
                    prompt.say("Please type a more commonly used word or a word that appears in your sample.")?;
                    if let Some(word) = successors.random_word(rng) {
                        prompt.say(&format!("For example: {word}"))?;
                    }
                }
                Err(PoemError::InvalidStartWord { syllables, budget, .. }) => prompt.say(&format!(
                    "That word has {syllables} syllables but the first line only has {budget}. Please pick a shorter one."
                ))?,
                Err(PoemError::GenerationExhausted { .. }) => {
                    prompt.say("No haiku could be finished from that word. Please try another one.")?
                }
                Err(e) => return Err(io::Error::other(e)),
            }
        }
        Ok(())
    }

    fn freeform<I: BufRead, O: Write, R: Rng + ?Sized>(&self, prompt: &mut Prompt<I, O>, rng: &mut R) -> io::Result<()> {
        let themes = self.resources.themes();
        prompt.say("Please type a theme that is listed below: ")?;
        let names: Vec<&str> = themes.themes().collect();
        for row in names.chunks(3) {
            let row: String = row.iter().map(|name| format!("{name:<30}")).collect();
            prompt.say(row.trim_end())?;
        }

        let theme = loop {
            let Some(answer) = prompt.answer()? else { return Ok(()) };
            if themes.contains(&answer) {
                break answer;
            }
            prompt.say("Please enter the exact name of a listed theme.")?;
        };

        let default_lines = self.config.default_line_count();
        let max_lines = self.config.max_line_count();
        prompt.say(&format!("How many lines do you want your poem to be? (default {default_lines})"))?;
        let lines = loop {
            let Some(answer) = prompt.answer()? else { return Ok(()) };
            if answer.is_empty() {
                break default_lines;
            }
            match answer.parse::<usize>() {
                Ok(count) if count > max_lines => prompt.say(&format!("Please ask for at most {max_lines} lines."))?,
                Ok(count) if count > 0 => break count,
                _ => prompt.say("Please enter a positive whole number.")?,
            }
        };

        let poem = self.resources.freeform(&theme, lines, self.config, rng).map_err(io::Error::other)?;
        prompt.say(&format!("\n{poem}"))
    }
}
