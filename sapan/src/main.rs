use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use sapanlib::{
    analysis::Analyzer,
    charts::Charts,
    config::AppConfig,
    error::{Result, SapanError},
    generator,
    session::{ReportKind, Session, Tab},
    summary::{headline, render_summary},
    table::TableView,
    telemetry,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::{Path, PathBuf};

const DEFAULT_DATA_FILE: &str = "sap_data.csv";

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Report {
    TimeSeries,
    CostCenters,
    Materials,
    DocumentTypes,
    Correlation,
}

#[derive(Parser, Debug)]
#[command(name = "sapan", version, about = "Генерация и анализ синтетических проводок в стиле SAP")]
struct Cli {
    /// TOML-файл конфигурации (по умолчанию ./sapan.toml, если есть)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Отладочный лог (SAPAN_LOG имеет приоритет)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Без подкоманды: генерация, анализ и запуск оболочки
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Записать синтетические проводки
    Generate {
        /// Количество записей
        #[arg(short = 'n', long)]
        records: Option<usize>,

        /// Ширина окна дат проводок в днях
        #[arg(long)]
        days: Option<u32>,

        /// Seed генератора для воспроизводимого результата
        #[arg(long)]
        seed: Option<u64>,

        /// День после последней возможной даты проводки (по умолчанию сегодня)
        #[arg(long)]
        end_date: Option<NaiveDate>,

        /// Выходной файл; `.json` пишет JSON, остальное CSV
        #[arg(short = 'o', long, default_value = DEFAULT_DATA_FILE)]
        output: PathBuf,
    },

    /// Вывести сводную статистику
    Analyze {
        #[arg(short = 'i', long = "input")]
        input: PathBuf,

        /// Дополнительно записать три графика в SVG в этот каталог
        #[arg(long)]
        charts: Option<PathBuf>,

        /// Вывести все отчёты в JSON вместо текстовой сводки
        #[arg(long)]
        json: bool,
    },

    /// Вывести один отчёт таблицей
    Report {
        #[arg(value_enum)]
        kind: Report,

        #[arg(short = 'i', long = "input")]
        input: PathBuf,
    },

    /// Интерактивный просмотрщик
    Shell {
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,
    },

    /// Сгенерировать записи, вывести краткий итог и открыть оболочку
    Run {
        #[arg(short = 'n', long, default_value_t = 5000)]
        records: usize,

        #[arg(short = 'o', long, default_value = DEFAULT_DATA_FILE)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.verbose);

    let cwd = std::env::current_dir()?;
    let mut config = AppConfig::load(cli.config.as_deref(), &cwd)?;
    tracing::debug!(?config, "configuration resolved");

    match cli.command.unwrap_or(Command::Run {
        records: 5000,
        output: PathBuf::from(DEFAULT_DATA_FILE),
    }) {
        Command::Generate { records, days, seed, end_date, output } => {
            let gen = &mut config.generator;
            if let Some(n) = records {
                gen.records = n;
            }
            if let Some(d) = days {
                gen.days = d;
            }
            if seed.is_some() {
                gen.seed = seed;
            }
            if end_date.is_some() {
                gen.end_date = end_date;
            }
            let ledger = generator::generate(gen)?;
            generator::save(&ledger, &output)?;
            println!("Data saved in {}", output.display());
        }
        Command::Analyze { input, charts, json } => {
            let analyzer = Analyzer::from_path(&input, config.analysis.clone())?;
            let reports = analyzer.generate_all_reports()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                print!("{}", render_summary(&reports.basic_statistics));
            }
            if let Some(dir) = charts {
                let currency = analyzer.ledger().currency().unwrap_or("EUR");
                let rendered = Charts::render(&reports, config.analysis.top_cost_centers, currency)?;
                for path in rendered.save(&dir)? {
                    eprintln!("wrote {}", path.display());
                }
            }
        }
        Command::Report { kind, input } => {
            let analyzer = Analyzer::from_path(&input, config.analysis.clone())?;
            let table = match kind {
                Report::TimeSeries => TableView::from_time_series(&analyzer.time_series()?),
                Report::CostCenters => TableView::from_groups("CostCenter", &analyzer.cost_centers()?),
                Report::Materials => TableView::from_materials(&analyzer.materials()?),
                Report::DocumentTypes => TableView::from_groups("DocumentType", &analyzer.document_types()?),
                Report::Correlation => TableView::from_correlation(&analyzer.correlation()?),
            };
            print!("{}", table.render());
        }
        Command::Shell { input } => {
            let mut session = Session::new(config.analysis.clone());
            if let Some(path) = input {
                load(&mut session, &path);
            }
            shell(&mut session)?;
        }
        Command::Run { records, output } => {
            config.generator.records = records;
            println!("Generating SAP data...");
            let ledger = generator::generate(&config.generator)?;
            generator::save(&ledger, &output)?;
            println!("Data saved in {}", output.display());

            println!("\nAnalyzing data...");
            let currency = ledger.currency().unwrap_or("EUR").to_string();
            let reports = Analyzer::new(ledger, config.analysis.clone()).generate_all_reports()?;
            println!("\nGeneral statistics:\n{}", headline(&reports, &currency));

            println!("\nStarting viewer...");
            let mut session = Session::new(config.analysis.clone());
            load(&mut session, &output);
            shell(&mut session)?;
        }
    }
    Ok(())
}

fn load(session: &mut Session, path: &Path) {
    if session.load(path) {
        println!("Loaded {}", session.file_label());
        print!("{}", session.table().render());
    } else {
        println!("{}", session.summary_text());
    }
}

fn readline_error(e: ReadlineError) -> SapanError {
    match e {
        ReadlineError::Io(e) => SapanError::Io(e),
        other => SapanError::Terminal(other.to_string()),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  load <path>      select a ledger file (CSV or JSON)");
    println!("  analyze          run all reports");
    println!("  report <kind>    time-series, cost-centers, materials, document-types");
    println!("  tab <name>       summary, time-series, cost-centers, materials, table");
    println!("  show             print the active tab");
    println!("  charts <dir>     write the rendered charts as SVG");
    println!("  status           file and active tab");
    println!("  help, quit");
}

fn shell(session: &mut Session) -> Result<()> {
    let mut rl = DefaultEditor::new().map_err(readline_error)?;
    print_help();

    loop {
        let line = match rl.readline("sapan> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(readline_error(e)),
        };
        let line = line.trim();
        if !line.is_empty() {
            let _ = rl.add_history_entry(line);
        }
        let (cmd, arg) = match line.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (line, ""),
        };

        match cmd {
            "" => continue,
            "load" if arg.is_empty() => println!("usage: load <path>"),
            "load" => load(session, Path::new(arg)),
            "analyze" => {
                session.analyze();
                session.select_tab(Tab::Summary);
                println!("{}", session.summary_text());
            }
            "report" => match arg.parse::<ReportKind>() {
                Ok(kind) if session.reports().is_none() => {
                    println!("{}: run `analyze` first", kind.title());
                }
                Ok(kind) => {
                    session.select_report(kind);
                    println!("[{}]", session.tab());
                    print!("{}", session.render_current());
                }
                Err(e) => println!("{e}"),
            },
            "tab" => match arg.parse::<Tab>() {
                Ok(tab) => {
                    session.select_tab(tab);
                    print!("{}", session.render_current());
                }
                Err(e) => println!("{e}"),
            },
            "show" => {
                println!("[{}]", session.tab());
                print!("{}", session.render_current());
            }
            "charts" if arg.is_empty() => println!("usage: charts <dir>"),
            "charts" => match session.charts() {
                Some(charts) => match charts.save(Path::new(arg)) {
                    Ok(paths) => paths.iter().for_each(|p| println!("wrote {}", p.display())),
                    Err(e) => println!("{e}"),
                },
                None => println!("run `analyze` first"),
            },
            "status" => println!("file: {}\ntab: {}", session.file_label(), session.tab()),
            "help" | "?" => print_help(),
            "quit" | "exit" | "q" => break,
            other => println!("unknown command: {other} (try `help`)"),
        }
    }
    Ok(())
}
