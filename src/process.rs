//! File processing: find the phone and company columns and split them.
//!
//! Every column is classified; the column with the highest `PhoneNumber`
//! score and the one with the highest `CompanyName` score are decomposed into
//! `Country`/`Number` and `Name`/`Legal`. Source columns are kept as they are
//! and the new columns are assigned by name, so an existing column with one of
//! those names is overwritten.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{debug, info};

use crate::{
    classify::{Classifier, ColumnClassification},
    cli::ParseArgs,
    company::{legal_words, parse_company_column},
    error::LookupError,
    io_utils,
    phone::parse_phone_column,
    scoring::SemanticType,
    table::Table,
};

pub const COUNTRY_COLUMN: &str = "Country";
pub const NUMBER_COLUMN: &str = "Number";
pub const NAME_COLUMN: &str = "Name";
pub const LEGAL_COLUMN: &str = "Legal";
pub const DEFAULT_OUTPUT_FILE: &str = "output.csv";

/// A column picked by position, so duplicate header names stay unambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedColumn {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BestColumns {
    pub phone: Option<SelectedColumn>,
    pub company: Option<SelectedColumn>,
    /// Classification of every column, in table order.
    pub classifications: Vec<(String, ColumnClassification)>,
}

/// Running maximum over column scores; later columns only win when strictly higher.
#[derive(Debug, Default)]
struct BestColumn<'a> {
    selected: Option<(usize, &'a str)>,
    score: f64,
}

impl<'a> BestColumn<'a> {
    fn offer(&mut self, index: usize, name: &'a str, score: f64) {
        if score > self.score {
            self.selected = Some((index, name));
            self.score = score;
        }
    }

    fn into_selected(self) -> Option<SelectedColumn> {
        self.selected.map(|(index, name)| SelectedColumn {
            index,
            name: name.to_string(),
        })
    }
}

pub fn find_best_columns(
    table: &Table,
    classifier: &Classifier,
    data_dir: &Path,
) -> Result<BestColumns> {
    let mut phone = BestColumn::default();
    let mut company = BestColumn::default();
    let mut classifications = Vec::with_capacity(table.headers().len());

    for (index, (name, values)) in table.columns().enumerate() {
        let classification = classifier
            .classify_column(values, data_dir)
            .with_context(|| format!("Classifying column '{name}'"))?;
        debug!(
            "Column {} '{}' -> {} {:?}",
            index, name, classification.label, classification.scores
        );
        phone.offer(index, name, classification.scores.get(SemanticType::PhoneNumber));
        company.offer(index, name, classification.scores.get(SemanticType::CompanyName));
        classifications.push((name.to_string(), classification));
    }

    Ok(BestColumns {
        phone: phone.into_selected(),
        company: company.into_selected(),
        classifications,
    })
}

fn selected_values<'t>(table: &'t Table, column: &SelectedColumn) -> Result<&'t [String]> {
    table
        .column_at(column.index)
        .ok_or_else(|| anyhow!("Column {} '{}' is out of range", column.index, column.name))
}

/// Returns a copy of `table` with the decomposed phone and company columns added.
pub fn process_table(table: &Table, classifier: &Classifier, data_dir: &Path) -> Result<Table> {
    let best = find_best_columns(table, classifier, data_dir)?;
    let mut output = table.clone();

    if let Some(column) = &best.phone {
        info!(
            "Splitting phone numbers from column {} '{}'",
            column.index, column.name
        );
        let values = selected_values(table, column)?;
        let (countries, numbers) = parse_phone_column(values);
        output.set_column(COUNTRY_COLUMN, countries);
        output.set_column(NUMBER_COLUMN, numbers);
    }

    if let Some(column) = &best.company {
        info!(
            "Splitting company names from column {} '{}'",
            column.index, column.name
        );
        let reference = classifier.cache().get(data_dir)?;
        let vocabulary = legal_words(&reference);
        let values = selected_values(table, column)?;
        let (names, legals) = parse_company_column(values, &vocabulary);
        output.set_column(NAME_COLUMN, names.into_iter().map(Some));
        output.set_column(LEGAL_COLUMN, legals.into_iter().map(Some));
    }

    Ok(output)
}

pub fn default_output_path(input: &Path) -> PathBuf {
    let absolute = std::path::absolute(input).unwrap_or_else(|_| input.to_path_buf());
    absolute
        .parent()
        .map(|dir| dir.join(DEFAULT_OUTPUT_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE))
}

#[derive(Debug, Clone)]
pub struct FileOptions {
    pub delimiter: Option<u8>,
    pub output_delimiter: Option<u8>,
    pub encoding: &'static encoding_rs::Encoding,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            output_delimiter: None,
            encoding: encoding_rs::UTF_8,
        }
    }
}

/// Reads `input`, processes it and writes the result, returning the output path.
pub fn process_file(
    input: &Path,
    data_dir: &Path,
    output: Option<&Path>,
    classifier: &Classifier,
    options: &FileOptions,
) -> Result<PathBuf> {
    if !input.exists() {
        return Err(LookupError::InputNotFound(input.to_path_buf()).into());
    }
    let delimiter = io_utils::resolve_input_delimiter(input, options.delimiter);
    let table = Table::read(input, delimiter, options.encoding)
        .with_context(|| format!("Reading {input:?}"))?;
    info!(
        "Processing '{}' ({} row(s), {} column(s))",
        input.display(),
        table.row_count(),
        table.headers().len()
    );
    let processed = process_table(&table, classifier, data_dir)?;

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));
    let output_delimiter =
        io_utils::resolve_output_delimiter(&output_path, options.output_delimiter, delimiter);
    processed
        .write(&output_path, output_delimiter)
        .with_context(|| format!("Writing {output_path:?}"))?;
    info!("Wrote {} row(s) to {:?}", processed.row_count(), output_path);
    Ok(output_path)
}

pub fn execute(args: &ParseArgs, classifier: &Classifier) -> Result<()> {
    let options = FileOptions {
        delimiter: args.delimiter,
        output_delimiter: args.output_delimiter,
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
    };
    let written = process_file(
        &args.input,
        &args.data_dir,
        args.output.as_deref(),
        classifier,
        &options,
    )?;
    println!("{}", written.display());
    Ok(())
}
