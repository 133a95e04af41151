//! CSV 上传解析
//!
//! 读取 multipart 中名为 `file` 的字段，按表头名定位列。

use std::collections::HashMap;
use std::io::Cursor;

use actix_multipart::Multipart;
use futures_util::StreamExt;

use crate::models::ErrorCode;

/// 导入解析错误
#[derive(Debug, Clone, PartialEq)]
pub enum ImportParseError {
    FileMissing,
    FileTooLarge(usize),
    MissingColumn(String),
    ParseFailed(String),
    EmptyFile,
    TooManyRows(usize),
}

impl ImportParseError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::FileMissing => ErrorCode::ImportFileMissing,
            Self::FileTooLarge(_) => ErrorCode::ImportFileTooLarge,
            Self::MissingColumn(_) | Self::ParseFailed(_) => ErrorCode::ImportFileFormatInvalid,
            Self::EmptyFile | Self::TooManyRows(_) => ErrorCode::ImportFileDataInvalid,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::FileMissing => "未找到文件字段 file".to_string(),
            Self::FileTooLarge(limit) => format!("文件超过大小限制 ({limit} 字节)"),
            Self::MissingColumn(col) => format!("缺少必需列: {col}"),
            Self::ParseFailed(msg) => msg.clone(),
            Self::EmptyFile => "文件中没有数据行".to_string(),
            Self::TooManyRows(limit) => format!("单次导入最多支持 {limit} 行"),
        }
    }
}

/// 从 multipart 中读取 `file` 字段
pub async fn read_file_from_multipart(
    payload: &mut Multipart,
    max_size: usize,
) -> Result<Vec<u8>, ImportParseError> {
    let mut file_bytes = Vec::new();
    let mut found = false;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| ImportParseError::ParseFailed(format!("读取字段失败: {e}")))?;

        if field.name() != Some("file") {
            // 其余字段读完丢弃
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| ImportParseError::ParseFailed(format!("读取数据失败: {e}")))?;
            }
            continue;
        }

        found = true;
        while let Some(chunk) = field.next().await {
            let data =
                chunk.map_err(|e| ImportParseError::ParseFailed(format!("读取数据失败: {e}")))?;
            if file_bytes.len() + data.len() > max_size {
                return Err(ImportParseError::FileTooLarge(max_size));
            }
            file_bytes.extend_from_slice(&data);
        }
    }

    if !found {
        return Err(ImportParseError::FileMissing);
    }
    Ok(file_bytes)
}

/// 一行数据，`row_num` 为文件中的行号（表头为第 1 行）
#[derive(Debug, Clone)]
pub struct CsvRow {
    pub row_num: usize,
    values: Vec<String>,
}

/// 解析后的表格
#[derive(Debug, Clone)]
pub struct CsvTable {
    columns: HashMap<String, usize>,
    pub rows: Vec<CsvRow>,
}

impl CsvTable {
    /// 解析 CSV，缺少任一必需列时报错
    pub fn parse(
        data: &[u8],
        required: &[&str],
        max_rows: usize,
    ) -> Result<CsvTable, ImportParseError> {
        // 去掉 UTF-8 BOM
        let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(Cursor::new(data));

        let headers = rdr
            .headers()
            .map_err(|e| ImportParseError::ParseFailed(format!("读取表头失败: {e}")))?;
        let columns: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();

        for col in required {
            if !columns.contains_key(*col) {
                return Err(ImportParseError::MissingColumn(col.to_string()));
            }
        }

        let mut rows = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| {
                ImportParseError::ParseFailed(format!("第 {} 行解析失败: {e}", idx + 2))
            })?;
            // 跳过空行
            if record.iter().all(|v| v.is_empty()) {
                continue;
            }
            if rows.len() >= max_rows {
                return Err(ImportParseError::TooManyRows(max_rows));
            }
            rows.push(CsvRow {
                row_num: idx + 2,
                values: record.iter().map(|v| v.to_string()).collect(),
            });
        }

        if rows.is_empty() {
            return Err(ImportParseError::EmptyFile);
        }

        Ok(CsvTable { columns, rows })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// 取单元格，空串视为缺失
    pub fn get<'a>(&self, row: &'a CsvRow, name: &str) -> Option<&'a str> {
        self.columns
            .get(name)
            .and_then(|i| row.values.get(*i))
            .map(|v| v.as_str())
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_matched_case_insensitively() {
        let data = b"Code,Description\nPLO1, Apply knowledge \nPLO2,Communicate\n";
        let table = CsvTable::parse(data, &["code", "description"], 100).unwrap();
        assert_eq!(table.rows.len(), 2);
        let first = &table.rows[0];
        assert_eq!(first.row_num, 2);
        assert_eq!(table.get(first, "code"), Some("PLO1"));
        assert_eq!(table.get(first, "description"), Some("Apply knowledge"));
        assert_eq!(table.get(first, "plo_code"), None);
    }

    #[test]
    fn missing_required_column_is_reported() {
        let data = b"code\nPLO1\n";
        let err = CsvTable::parse(data, &["code", "description"], 100).unwrap_err();
        assert_eq!(err, ImportParseError::MissingColumn("description".into()));
        assert_eq!(err.error_code(), ErrorCode::ImportFileFormatInvalid);
    }

    #[test]
    fn bom_and_blank_lines_are_ignored() {
        let data = "\u{feff}student_code,full_name,email\nS001,An Nguyen,an@example.com\n,,\n";
        let table = CsvTable::parse(data.as_bytes(), &["student_code"], 100).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert!(table.has_column("email"));
    }

    #[test]
    fn row_limit_and_empty_files_are_rejected() {
        let data = b"code,description\nA,a\nB,b\nC,c\n";
        assert_eq!(
            CsvTable::parse(data, &["code"], 2).unwrap_err(),
            ImportParseError::TooManyRows(2)
        );
        assert_eq!(
            CsvTable::parse(b"code,description\n", &["code"], 10).unwrap_err(),
            ImportParseError::EmptyFile
        );
    }
}
