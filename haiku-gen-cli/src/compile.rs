use std::path::{Path, PathBuf};

use clap::Args;
use log::info;

use haiku_gen_core::ResourcePaths;
use haiku_gen_core::lexicon::pos_table::PosTable;
use haiku_gen_core::lexicon::theme_table::ThemeTable;
use haiku_gen_core::model::syllable_table::SyllableTable;

#[derive(Args)]
pub struct CompileArgs {
    /// CMU pronouncing dictionary (cmudict-0.7b)
    #[arg(long)]
    cmudict: Option<PathBuf>,

    /// Moby part-of-speech list (mobypos.txt)
    #[arg(long)]
    moby: Option<PathBuf>,

    /// Theme list, one `theme: noun, noun, ...` per line
    #[arg(long)]
    themes: Option<PathBuf>,
}

/// Converts every source given on the command line into its binary table.
pub fn run(args: &CompileArgs, data_dir: &Path, paths: &ResourcePaths) -> Result<(), Box<dyn std::error::Error>> {
    if args.cmudict.is_none() && args.moby.is_none() && args.themes.is_none() {
        return Err("nothing to compile: pass --cmudict, --moby and/or --themes".into());
    }
    let paths = paths.resolve(data_dir);

    if let Some(source) = &args.cmudict {
        let table = SyllableTable::from_cmudict_file(source)?;
        table.save(&paths.syllables)?;
        info!("{} words -> {}", table.len(), paths.syllables.display());
        println!("Wrote {} syllable counts to {}", table.len(), paths.syllables.display());
    }

    if let Some(source) = &args.moby {
        let table = PosTable::from_moby_file(source)?;
        table.save(&paths.parts_of_speech)?;
        let tags: String = table.tags().collect();
        println!("Wrote tags [{tags}] to {}", paths.parts_of_speech.display());
    }

    if let Some(source) = &args.themes {
        let table = ThemeTable::from_text_file(source)?;
        table.save(&paths.themes)?;
        println!("Wrote {} themes to {}", table.len(), paths.themes.display());
    }

    Ok(())
}
