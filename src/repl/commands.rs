//! REPL Commands
//!
//! Parses input lines and runs them against the PokeAPI client. All output
//! goes to a caller-supplied writer.

use std::io::Write;

use anyhow::{Context, Result};
use rand::Rng;
use tracing::{debug, error};

use crate::api::PokeApi;
use crate::repl::LineSource;

/// Shown before every input line
pub const PROMPT: &str = "\npokedex > ";

/// Name and help text of one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Every command, in the order `help` lists them
pub const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "help",
        description: "displays a help message",
    },
    CommandInfo {
        name: "exit",
        description: "exits the pokedex REPL",
    },
    CommandInfo {
        name: "map",
        description: "advances the map, displaying location information",
    },
    CommandInfo {
        name: "mapb",
        description: "moves the map backwards, displaying location information",
    },
    CommandInfo {
        name: "explore",
        description: "explores a location-area, revealing nearby pokemon",
    },
    CommandInfo {
        name: "catch",
        description: "attempts to catch a pokemon",
    },
];

/// What the loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// A throw with `roll` drawn from `[0, base_experience)` catches the pokemon
/// when `roll²` exceeds its base experience.
///
/// Pokemon without base experience are always caught.
pub fn catch_succeeds(roll: u32, base_experience: u32) -> bool {
    base_experience == 0 || u64::from(roll).pow(2) > u64::from(base_experience)
}

// == Repl ==
/// Session state: paging cursors plus the API client.
pub struct Repl<R> {
    api: PokeApi,
    next_page: Option<String>,
    previous_page: Option<String>,
    rng: R,
}

impl<R: Rng> Repl<R> {
    pub fn new(api: PokeApi, rng: R) -> Self {
        Self {
            api,
            next_page: None,
            previous_page: None,
            rng,
        }
    }

    // == Run ==
    /// Reads commands from `input` until `exit` or end of input.
    ///
    /// A failing command is logged and the loop keeps going. Dropping the
    /// returned future drops `input` with it.
    pub async fn run<I, W>(&mut self, mut input: I, out: &mut W) -> Result<()>
    where
        I: LineSource,
        W: Write,
    {
        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;

            let Some(line) = input.next_line().await.context("failed to read input")? else {
                debug!("End of input");
                writeln!(out)?;
                return Ok(());
            };

            match self.execute(&line, out).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(err) => error!("{:#}", err),
            }
        }
    }

    // == Execute ==
    /// Runs a single input line.
    pub async fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Flow::Continue);
        };
        let args: Vec<&str> = words.collect();
        debug!(command, ?args, "Running command");

        match command {
            "help" => self.help(out)?,
            "exit" => return Ok(Flow::Exit),
            "map" => self.map(out).await?,
            "mapb" => self.map_back(out).await?,
            "explore" => self.explore(&args, out).await?,
            "catch" => self.catch(&args, out).await?,
            _ => writeln!(out, "Invalid command.\nType 'help' for more information")?,
        }
        Ok(Flow::Continue)
    }

    fn help<W: Write>(&self, out: &mut W) -> Result<()> {
        for command in COMMANDS {
            writeln!(out, "{:>8} -- {}", command.name, command.description)?;
        }
        Ok(())
    }

    async fn map<W: Write>(&mut self, out: &mut W) -> Result<()> {
        // Past the last page this wraps around to the first one.
        let url = self.next_page.clone();
        self.show_page(url.as_deref(), out).await
    }

    async fn map_back<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let Some(url) = self.previous_page.clone() else {
            writeln!(out, "Error: already on first page.")?;
            return Ok(());
        };
        self.show_page(Some(&url), out).await
    }

    async fn show_page<W: Write>(&mut self, url: Option<&str>, out: &mut W) -> Result<()> {
        let page = self
            .api
            .location_areas(url)
            .await
            .context("failed to load location areas")?;

        self.next_page = page.next;
        self.previous_page = page.previous;
        for location in &page.results {
            writeln!(out, "{}", location.name)?;
        }
        Ok(())
    }

    async fn explore<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        let [area] = args else {
            writeln!(
                out,
                "Usage: explore <location_area>\nType 'help' for more information"
            )?;
            return Ok(());
        };

        writeln!(out, "Exploring {}...", area)?;
        let area = self
            .api
            .location_area(area)
            .await
            .with_context(|| format!("failed to explore {}", area))?;

        writeln!(out, "Found Pokemon:")?;
        for name in area.pokemon_names() {
            writeln!(out, "- {}", name)?;
        }
        Ok(())
    }

    async fn catch<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        let [name] = args else {
            writeln!(
                out,
                "Usage: catch <pokemon>\nType 'help' for more information"
            )?;
            return Ok(());
        };

        writeln!(out, "Throwing a Pokeball at {}...", name)?;
        let pokemon = self
            .api
            .pokemon(name)
            .await
            .with_context(|| format!("failed to look up {}", name))?;

        let base_experience = pokemon.base_experience.unwrap_or(0);
        let roll = if base_experience == 0 {
            0
        } else {
            self.rng.gen_range(0..base_experience)
        };

        if catch_succeeds(roll, base_experience) {
            writeln!(out, "{} was caught!", pokemon.name)?;
        } else {
            writeln!(out, "{} escaped!", pokemon.name)?;
        }
        Ok(())
    }
}
