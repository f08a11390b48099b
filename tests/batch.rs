use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use biblio_reports::batch::{discover_inputs, run_once, run_once_with, FileMover, FsMover};
use biblio_reports::config::{FolderLayout, ProcessingConfig};
use biblio_reports::report::ReportType;

fn tmp_layout(name: &str) -> FolderLayout {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let root = std::env::temp_dir().join(format!("biblio-reports-{name}-{nanos}"));
    FolderLayout {
        input: root.join("Entrada"),
        output: root.join("Saida"),
        processed: root.join("Entrada/Processados"),
        errors: root.join("Entrada/Erros"),
    }
}

fn cleanup(layout: &FolderLayout) {
    if let Some(root) = layout.input.parent() {
        let _ = std::fs::remove_dir_all(root);
    }
}

fn write_loan_fixture(path: &Path) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    let header = [
        "Nome da pessoa",
        "Gênero",
        "Nome da biblioteca",
        "Email",
        "Nome pessoa empréstimo",
    ];
    for (col, name) in header.iter().enumerate() {
        ws.write_string(0, col as u16, *name).unwrap();
    }
    ws.write_string(1, 0, "Ana Paula Costa").unwrap();
    ws.write_string(1, 1, "F").unwrap();
    ws.write_string(1, 2, "Biblioteca Campus I - Unid. 1").unwrap();
    ws.write_string(1, 3, "ana@ex.org").unwrap();
    ws.write_string(1, 4, "Ana").unwrap();
    wb.save(path).unwrap();
}

fn write_pending_fixture(path: &Path) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    let date_fmt = Format::new().set_num_format("dd/mm/yyyy");
    let header = [
        "Nome da pessoa",
        "Email",
        "Data de empréstimo",
        "Data devolução prevista",
        "Título",
        "Nome da biblioteca",
    ];
    for (col, name) in header.iter().enumerate() {
        ws.write_string(0, col as u16, *name).unwrap();
    }
    ws.write_string(1, 0, "Maria Souza Lima").unwrap();
    ws.write_string(1, 1, "maria@ex.org").unwrap();
    ws.write_datetime_with_format(1, 2, ExcelDateTime::from_serial_datetime(45838.0).unwrap(), &date_fmt)
        .unwrap();
    ws.write_datetime_with_format(1, 3, ExcelDateTime::from_serial_datetime(45852.0).unwrap(), &date_fmt)
        .unwrap();
    ws.write_string(1, 4, "Dom Casmurro").unwrap();
    ws.write_string(1, 5, "Biblioteca Campus II").unwrap();
    wb.save(path).unwrap();
}

#[test]
fn discovery_only_returns_supported_files() {
    let layout = tmp_layout("discover");
    layout.ensure().unwrap();

    write_loan_fixture(&layout.input.join("emprestimos_b.xlsx"));
    write_loan_fixture(&layout.input.join("emprestimos_a.xlsx"));
    std::fs::write(layout.input.join("notas.txt"), "ignore me").unwrap();

    let inputs = discover_inputs(&layout).unwrap();
    let names: Vec<String> = inputs
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["emprestimos_a.xlsx", "emprestimos_b.xlsx"]);

    cleanup(&layout);
}

#[test]
fn run_once_moves_files_by_outcome() {
    let layout = tmp_layout("run-once");
    layout.ensure().unwrap();

    write_loan_fixture(&layout.input.join("emprestimos_julho.xlsx"));
    write_pending_fixture(&layout.input.join("pendencia_julho.xlsx"));
    // Supported extension but unclassifiable name: processed and failed.
    write_loan_fixture(&layout.input.join("relatorio_geral.xlsx"));

    let cfg = ProcessingConfig::default();
    let summary = run_once(&cfg, &layout, None).unwrap();

    assert_eq!(summary.total(), 3);
    assert_eq!(summary.succeeded.len(), 2);
    assert_eq!(summary.failed.len(), 1);
    assert!(!summary.all_ok());

    // Inputs were moved out of the input folder.
    assert!(discover_inputs(&layout).unwrap().is_empty());
    assert!(layout.processed.join("emprestimos_julho.xlsx").exists());
    assert!(layout.processed.join("pendencia_julho.xlsx").exists());
    assert!(layout.errors.join("relatorio_geral.xlsx").exists());

    // Both report flavors produced a workbook in the output folder.
    let loan_outcome = summary
        .succeeded
        .iter()
        .find(|(_, o)| o.report_type == ReportType::Loan)
        .map(|(_, o)| o)
        .unwrap();
    let pending_outcome = summary
        .succeeded
        .iter()
        .find(|(_, o)| o.report_type == ReportType::Pending)
        .map(|(_, o)| o)
        .unwrap();
    assert!(loan_outcome.output_path.exists());
    assert!(pending_outcome.output_path.exists());

    cleanup(&layout);
}

#[test]
fn same_type_files_in_one_pass_get_distinct_outputs() {
    // Two loan exports processed within the same second must not write to the
    // same timestamped workbook name.
    let layout = tmp_layout("distinct-outputs");
    layout.ensure().unwrap();
    write_loan_fixture(&layout.input.join("emprestimos_junho.xlsx"));
    write_loan_fixture(&layout.input.join("emprestimos_julho.xlsx"));

    let cfg = ProcessingConfig::default();
    let summary = run_once(&cfg, &layout, None).unwrap();

    assert_eq!(summary.succeeded.len(), 2);
    let (_, first) = &summary.succeeded[0];
    let (_, second) = &summary.succeeded[1];
    assert_ne!(first.output_path, second.output_path);
    assert!(first.output_path.exists());
    assert!(second.output_path.exists());

    cleanup(&layout);
}

// Refuses to move files whose name contains "travado".
struct StickyMover;

impl FileMover for StickyMover {
    fn move_to(&self, src: &Path, dest_dir: &Path) -> std::io::Result<std::path::PathBuf> {
        if src.to_string_lossy().contains("travado") {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "file is locked",
            ));
        }
        FsMover.move_to(src, dest_dir)
    }
}

#[test]
fn move_failure_does_not_abort_the_batch() {
    let layout = tmp_layout("sticky-move");
    layout.ensure().unwrap();
    write_loan_fixture(&layout.input.join("emprestimos_ok.xlsx"));
    write_loan_fixture(&layout.input.join("emprestimos_travado.xlsx"));

    let cfg = ProcessingConfig::default();
    let summary = run_once_with(&cfg, &layout, None, &StickyMover).unwrap();

    // Both files were processed; one could not be moved afterwards.
    assert_eq!(summary.succeeded.len(), 2);
    assert_eq!(summary.failed.len(), 0);
    assert_eq!(summary.move_failures.len(), 1);
    assert!(!summary.all_ok());
    assert!(summary.move_failures[0]
        .0
        .to_string_lossy()
        .contains("emprestimos_travado"));

    // The movable file left the input folder, the stuck one stayed behind.
    assert!(layout.processed.join("emprestimos_ok.xlsx").exists());
    assert!(layout.input.join("emprestimos_travado.xlsx").exists());

    cleanup(&layout);
}

#[test]
fn pending_dates_survive_to_the_output_workbook() {
    let layout = tmp_layout("pending-dates");
    layout.ensure().unwrap();
    write_pending_fixture(&layout.input.join("pendencia_julho.xlsx"));

    let cfg = ProcessingConfig::default();
    let summary = run_once(&cfg, &layout, None).unwrap();
    let (_, outcome) = &summary.succeeded[0];

    let mut wb = open_workbook_auto(&outcome.output_path).unwrap();
    let range = wb.worksheet_range("Base").unwrap();
    let data_row: Vec<&Data> = range.rows().nth(1).unwrap().iter().collect();

    // Cleaned pending order: name, email, title, loan date, due date, library.
    assert_eq!(data_row[0], &Data::String("Maria".to_string()));
    assert_eq!(data_row[2], &Data::String("Dom Casmurro".to_string()));
    assert!(matches!(data_row[3], Data::DateTime(_)));
    assert!(matches!(data_row[4], Data::DateTime(_)));

    cleanup(&layout);
}

#[test]
fn pending_base_sheet_is_present() {
    // Pending output gained a consolidated base sheet; make sure it is first.
    let layout = tmp_layout("pending-base");
    layout.ensure().unwrap();
    write_pending_fixture(&layout.input.join("pendencia_julho.xlsx"));

    let cfg = ProcessingConfig::default();
    let summary = run_once(&cfg, &layout, None).unwrap();
    let (_, outcome) = &summary.succeeded[0];

    let wb = open_workbook_auto(&outcome.output_path).unwrap();
    assert_eq!(
        wb.sheet_names(),
        vec!["Base", "Unidade 1", "Unidade 2", "Campus II"]
    );
    assert_eq!(outcome.sheet_counts[0], ("Base".to_string(), 1));

    cleanup(&layout);
}
