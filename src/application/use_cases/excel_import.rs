use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::error::Result;
use crate::domain::submission::{normalize_date, SubmissionRecord};
use crate::infrastructure::excel::{read_first_sheet, SheetData};

// The intake form exports fixed Korean headers; columns are located by header
// text, never by position guessing.
const H_RESPONSE_DATE: &str = "응답일시";
const H_PARTICIPANT: &str = "참여자";
const H_NAME: &str = "성함 혹은 업체명(*)";
const H_CONTACT: &str = "연락처(*)";
const H_EMAIL: &str = "이메일 ( 세금계산서 하실 시 필수)";
const H_BUSINESS_REG: &str = "사업자 등록증 ( 세금계산서 하실 시 필수 )";
const H_PRIVACY: &str = "개인정보 수집 동의(*)";
const H_FIRST_TIME: &str = "처음이신가요? 구매한 적 있으신가요?(*)";
const H_DESCRIPTION: &str = "주문하려는 상품에 대해 알려주세요:)(*)";
const H_SIZE: &str = "제품의 사이즈를 알려주세요.(*)";
const H_THICKNESS: &str = "두께를 알려주세요.(*)";
const H_MATERIAL: &str = "재료를 알려주세요(*)";
const H_COLOR: &str = "컬러를 알려주세요.(*)";
const H_QUANTITY: &str = "수량은 몇개인가요?(*)";
const H_DELIVERY: &str = "납품은 언제쯤 원하시나요?(*)";
const H_PRODUCT_IMAGE: &str = "제품을 설명할 수 있는 자료를 올려주세요.( 이미지 )";
const H_DRAWING: &str = "제품 도면을 올려주세요";
const H_INQUIRY: &str = "문의사항을 적어주세요.(*)";
const H_REFERRAL: &str = "아크릴 맛집을 어느 경로를 통해 오셨는지 알려주시면 감사하겠습니다!(*)";

const PRIVACY_AGREED: &str = "Y";
const FIRST_TIME_ANSWER: &str = "처음입니다.";

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(http|https)://").unwrap());

fn is_url_like(value: &str) -> bool {
    URL_PATTERN.is_match(value)
}

/// Maps the first sheet of an uploaded workbook into submission records.
#[derive(Debug, Default)]
pub struct ExcelImporter;

impl ExcelImporter {
    pub fn parse(&self, bytes: &[u8]) -> Result<Vec<SubmissionRecord>> {
        let sheet = read_first_sheet(bytes)?;
        Ok(self.map_sheet(&sheet))
    }

    fn map_sheet(&self, sheet: &SheetData) -> Vec<SubmissionRecord> {
        sheet
            .rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let ctx = RowContext {
                    sheet,
                    row,
                    row_idx,
                };
                map_row(&ctx)
            })
            .collect()
    }
}

/// One data row plus the sheet context needed to resolve its cells and the
/// hyperlinks anchored at its absolute coordinates.
struct RowContext<'a> {
    sheet: &'a SheetData,
    row: &'a [String],
    row_idx: usize,
}

impl RowContext<'_> {
    fn column(&self, header: &str) -> Option<usize> {
        self.sheet.headers.iter().position(|h| h == header)
    }

    fn text(&self, header: &str) -> String {
        self.column(header)
            .and_then(|col| self.row.get(col))
            .cloned()
            .unwrap_or_default()
    }

    fn opt_text(&self, header: &str) -> Option<String> {
        let value = self.text(header);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    fn hyperlink(&self, header: &str) -> Option<&String> {
        let col = self.column(header)?;
        // Header row sits at start_row; data row i is one below it.
        let abs_row = self.sheet.start_row + 1 + self.row_idx as u32;
        let abs_col = self.sheet.start_col + col as u32;
        self.sheet.hyperlinks.get(&(abs_row, abs_col))
    }

    /// Resolution precedence for link-like fields: hyperlink target if
    /// URL-shaped, then cell text if URL-shaped, then cell text if non-empty,
    /// then absent.
    fn resolved(&self, header: &str) -> Option<String> {
        if let Some(link) = self.hyperlink(header) {
            if is_url_like(link) {
                return Some(link.clone());
            }
        }
        let cell = self.text(header);
        if !cell.is_empty() {
            return Some(cell);
        }
        None
    }
}

fn map_row(ctx: &RowContext<'_>) -> SubmissionRecord {
    SubmissionRecord {
        response_date: normalize_date(&ctx.text(H_RESPONSE_DATE)),
        participant_number: parse_participant(&ctx.text(H_PARTICIPANT)),
        name_or_company: ctx.text(H_NAME),
        contact: ctx.text(H_CONTACT),
        email: ctx.opt_text(H_EMAIL),
        business_registration_file: ctx.resolved(H_BUSINESS_REG),
        privacy_agreement: ctx.text(H_PRIVACY) == PRIVACY_AGREED,
        first_time_buyer: ctx.text(H_FIRST_TIME) == FIRST_TIME_ANSWER,
        product_description: ctx.text(H_DESCRIPTION),
        product_size: ctx.text(H_SIZE),
        thickness: ctx.text(H_THICKNESS),
        material: ctx.text(H_MATERIAL),
        color: ctx.text(H_COLOR),
        quantity: ctx.opt_text(H_QUANTITY),
        desired_delivery: ctx.text(H_DELIVERY),
        product_image: ctx.resolved(H_PRODUCT_IMAGE),
        product_drawing: ctx.resolved(H_DRAWING),
        inquiry: ctx.text(H_INQUIRY),
        referral_source: ctx.opt_text(H_REFERRAL),
    }
}

/// Sequence numbers occasionally export as floats ("12.0"); anything that
/// still fails to parse degrades to 0 rather than dropping the row.
fn parse_participant(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return n;
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return f as i64;
    }
    if !trimmed.is_empty() {
        tracing::warn!("Unparseable participant number: {}", raw);
    }
    0
}
