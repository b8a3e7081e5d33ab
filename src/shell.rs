use std::{
    io::{self, BufRead, Write},
    process,
};

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::{
    controller::Controller,
    nominatim::GeoResolver,
    overpass::FeatureQueryClient,
    terminal::{TerminalList, TerminalMap},
};

const HELP: &str = "\
commands:
  search <address>   look up stores around an address
  radius <km>        change the search radius
  category <label>   show only one category
  all                show every category
  hover <n>          highlight the marker of result n
  leave <n>          restore the marker of result n
  open <n>           open result n in a maps site
  map                describe the map
  help               show this message
  quit               exit";

#[derive(Debug, PartialEq)]
pub enum Command {
    Search(String),
    Radius(f64),
    Category(Option<String>),
    Hover(usize),
    Leave(usize),
    Open(usize),
    Map,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        let index = || -> Result<usize> {
            match arg.parse::<usize>() {
                Ok(0) | Err(_) => bail!("expected a result number, got {arg:?}"),
                Ok(x) => Ok(x),
            }
        };

        Ok(Some(match name {
            "search" => Self::Search(arg.to_string()),
            "radius" => Self::Radius(
                arg.parse()
                    .with_context(|| format!("expected a radius in km, got {arg:?}"))?,
            ),
            "category" if arg.is_empty() => bail!("expected a category label"),
            "category" => Self::Category(Some(arg.to_string())),
            "all" => Self::Category(None),
            "hover" => Self::Hover(index()?),
            "leave" => Self::Leave(index()?),
            "open" => Self::Open(index()?),
            "map" => Self::Map,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            x => bail!("unknown command {x:?}, try help"),
        }))
    }
}

pub fn run<G, Q>(controller: &mut Controller<G, Q, TerminalMap, TerminalList>) -> Result<()>
where
    G: GeoResolver,
    Q: FeatureQueryClient,
{
    println!("{HELP}");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let command = match Command::parse(&line) {
            Ok(Some(x)) => x,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e:#}");
                continue;
            }
        };
        debug!(?command, "shell command");

        match command {
            // failures are already shown as notices
            Command::Search(address) => {
                let _ = controller.on_search_submitted(&address);
            }
            Command::Radius(km) => {
                let km = controller.on_radius_changed(km);
                println!("radius {km} km");
            }
            Command::Category(label) => controller.on_category_selected(label.as_deref()),
            Command::Hover(n) => hover(controller, n, true),
            Command::Leave(n) => hover(controller, n, false),
            Command::Open(n) => match controller.cards().get(n - 1) {
                Some(card) => open(&card.maps_url),
                None => eprintln!("no result {n}"),
            },
            Command::Map => println!("{}", controller.map().describe()),
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(()),
        }
    }
}

fn hover<G, Q>(
    controller: &mut Controller<G, Q, TerminalMap, TerminalList>,
    n: usize,
    hovered: bool,
) where
    G: GeoResolver,
    Q: FeatureQueryClient,
{
    match controller.cards().get(n - 1) {
        Some(card) => {
            if !controller.on_card_hover(card.point, hovered) {
                debug!(n, "no marker for card");
            }
        }
        None => eprintln!("no result {n}"),
    }
}

fn open(link: &str) {
    let opened = process::Command::new("xdg-open")
        .arg(link)
        .spawn()
        .and_then(|mut x| x.wait());
    match opened {
        Ok(status) if status.success() => {}
        _ => println!("{link}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_commands() {
        assert_eq!(
            Command::parse("search  Rua Augusta, 100 ").unwrap(),
            Some(Command::Search("Rua Augusta, 100".to_string()))
        );
        assert_eq!(
            Command::parse("radius 2.5").unwrap(),
            Some(Command::Radius(2.5))
        );
        assert_eq!(
            Command::parse("category Loja de Departamento").unwrap(),
            Some(Command::Category(Some("Loja de Departamento".to_string())))
        );
        assert_eq!(Command::parse("all").unwrap(), Some(Command::Category(None)));
        assert_eq!(Command::parse("hover 3").unwrap(), Some(Command::Hover(3)));
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn empty_search_is_left_to_the_controller() {
        assert_eq!(
            Command::parse("search").unwrap(),
            Some(Command::Search(String::new()))
        );
    }

    #[test]
    fn reject_bad_input() {
        assert!(Command::parse("hover 0").is_err());
        assert!(Command::parse("open x").is_err());
        assert!(Command::parse("radius far").is_err());
        assert!(Command::parse("category").is_err());
        assert!(Command::parse("dance").is_err());
    }
}
