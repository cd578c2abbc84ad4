use crate::argparse::{ApplyArgs, Commands, FilterSetArgs};
use record_filter::apply_filters_at;
use record_filter_cli::export::write_records;
use record_filter_cli::input::{load_filter_set, load_records, parse_now};
use record_filter_cli::report::{condition_status, describe_value, ConditionStatus};
use std::io::Write;
use tabular::{Row, Table};

pub fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Apply(args) => handle_apply_command(args),
        Commands::Fields(args) => handle_fields_command(args),
        Commands::Check(args) => handle_check_command(args),
    }
}

fn handle_apply_command(args: ApplyArgs) -> anyhow::Result<()> {
    let now = parse_now(args.now.as_deref())?;
    let records = load_records(&args.records)?;
    let set = load_filter_set(&args.filters)?;

    let filtered = apply_filters_at(&records, &set.conditions, &set.fields, now);
    log::info!(
        "{} of {} records match {} active condition(s)",
        filtered.len(),
        records.len(),
        set.active_count()
    );

    match &args.output {
        Some(path) => {
            let file = fs_err::File::create(path)?;
            write_records(&filtered, &set.fields, args.format, std::io::BufWriter::new(file))?;
            log::info!("Wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write_records(&filtered, &set.fields, args.format, &mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}

fn handle_fields_command(args: FilterSetArgs) -> anyhow::Result<()> {
    let set = load_filter_set(&args.filters)?;

    #[allow(clippy::literal_string_with_formatting_args)]
    let mut table = Table::new("{:<}  {:<}  {:<}  {:<}")
        .with_row(Row::from_cells(["Key", "Label", "Type", "Operators"].iter().cloned()));
    for field in &set.fields {
        let operators = field
            .field_type
            .operators()
            .iter()
            .map(|op| op.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(
            Row::new()
                .with_cell(&field.key)
                .with_cell(&field.label)
                .with_cell(field.field_type)
                .with_cell(operators),
        );
    }
    print!("{}", table);
    Ok(())
}

fn handle_check_command(args: FilterSetArgs) -> anyhow::Result<()> {
    let set = load_filter_set(&args.filters)?;

    #[allow(clippy::literal_string_with_formatting_args)]
    let mut table = Table::new("{:<}  {:<}  {:<}  {:<}  {:<}").with_row(Row::from_cells(
        ["Id", "Field", "Operator", "Value", "Status"].iter().cloned(),
    ));
    let mut active = 0;
    for condition in &set.conditions {
        let status = condition_status(&set, condition);
        if status == ConditionStatus::Active {
            active += 1;
        }
        table.add_row(
            Row::new()
                .with_cell(&condition.id)
                .with_cell(&condition.field_key)
                .with_cell(condition.operator.map(|op| op.as_str()).unwrap_or("-"))
                .with_cell(describe_value(condition.value.as_ref()))
                .with_cell(status),
        );
    }
    print!("{}", table);
    println!(
        "{} of {} conditions active ({} complete)",
        active,
        set.conditions.len(),
        set.active_count()
    );
    Ok(())
}
