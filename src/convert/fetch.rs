//! Runtime ingestion over HTTP: fetch the raw workbook bytes and convert them
//! in memory. A single resource, no retries; any failure is fatal to the
//! operation and surfaces as a load error for the caller to display.

use crate::convert::table_from_grid;
use crate::error::BenchtabError;
use crate::spreadsheet::{Workbook, WorkbookFormat};
use crate::table::Table;
use std::io::Cursor;
use url::Url;

/// Fetches a workbook over HTTP and converts its first sheet into a table.
///
/// The workbook format is detected from the URL path extension, defaulting to
/// `.xlsx`. The table's `metadata.source` is the URL itself.
///
/// # Arguments
/// * `url` - Address of the raw workbook binary
///
/// # Errors
/// * [`BenchtabError::Load`] when the request fails or the response status is
///   not a success
/// * [`BenchtabError::EmptyInput`] / [`BenchtabError::SpreadsheetError`] when
///   the downloaded bytes do not convert
pub fn fetch(url: &str) -> Result<Table, BenchtabError> {
    let response = reqwest::blocking::get(url).map_err(|error| load_error(url, &error))?;
    let status = response.status();
    if !status.is_success() {
        return Err(BenchtabError::Load {
            url: url.to_owned(),
            message: format!("unexpected status {status}"),
        });
    }
    let bytes = response.bytes().map_err(|error| load_error(url, &error))?;

    let format = detect_format(url);
    let mut workbook = Workbook::from_reader(Cursor::new(bytes.to_vec()), format)?;
    let sheet = workbook
        .first_sheet_name()
        .ok_or_else(|| BenchtabError::EmptyInput(url.to_owned()))?;
    let grid = workbook.grid(&sheet)?;
    table_from_grid(grid, url.to_owned(), sheet)
}

/// Wraps a transport error into the load taxonomy.
fn load_error(url: &str, error: &reqwest::Error) -> BenchtabError {
    BenchtabError::Load {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

/// Workbook format from the URL path extension, `.xlsx` when unrecognized.
fn detect_format(url: &str) -> WorkbookFormat {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|segments| segments.last().map(str::to_owned))
        })
        .and_then(|name| {
            name.rsplit_once('.')
                .and_then(|(_, extension)| WorkbookFormat::from_extension(extension))
        })
        .unwrap_or(WorkbookFormat::Xlsx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook as XlsxWorkbook;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves one canned HTTP response on a loopback port.
    fn serve_once(response: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let address = listener.local_addr().expect("local address");
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request);
            stream.write_all(&response).expect("write response");
        });
        format!("http://{address}/tabla.xlsx")
    }

    fn http_response(status_line: &str, body: &[u8]) -> Vec<u8> {
        let mut response = format!(
            "{status_line}\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(body);
        response
    }

    #[test]
    fn successful_fetch_converts_the_workbook() {
        let mut workbook = XlsxWorkbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write(0, 0, "Model").expect("write header");
        worksheet.write(1, 0, "gemma2-9b-it").expect("write cell");
        let body = workbook.save_to_buffer().expect("save to buffer");

        let url = serve_once(http_response("HTTP/1.1 200 OK", &body));
        let table = fetch(&url).expect("fetch");
        assert_eq!(table.headers, vec!["Model"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.metadata.source, url);
    }

    #[test]
    fn non_success_status_is_a_load_error() {
        let url = serve_once(http_response("HTTP/1.1 404 Not Found", b""));
        let result = fetch(&url);
        match result {
            Err(BenchtabError::Load { message, .. }) => {
                assert!(message.contains("404"), "unexpected message: {message}");
            }
            other => panic!("expected load error, got {other:?}"),
        }
    }

    #[test]
    fn refused_connection_is_a_load_error() {
        // Bind a port and drop it so the connection is refused immediately
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let address = listener.local_addr().expect("local address");
        drop(listener);

        let result = fetch(&format!("http://{address}/tabla.xlsx"));
        assert!(matches!(result, Err(BenchtabError::Load { .. })));
    }

    #[test]
    fn format_detection_reads_the_url_path() {
        assert_eq!(detect_format("https://example.org/data/tabla.ods"), WorkbookFormat::Ods);
        assert_eq!(detect_format("https://example.org/data/tabla.xls"), WorkbookFormat::Xls);
        assert_eq!(detect_format("https://example.org/data/tabla"), WorkbookFormat::Xlsx);
        assert_eq!(detect_format("not a url"), WorkbookFormat::Xlsx);
    }
}
