//! Paginated voice listing for UI consumers.
//!
//! Pages are 1-based. "More data" is inferred from a full page: an
//! exact-multiple page means "maybe more" and costs the caller one extra
//! request that may come back empty. Per-item content failures degrade
//! to the silent clip so a single corrupt recording never blanks the
//! whole list.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use voxbridge_ledger::LedgerService;
use voxbridge_media::{empty_wav, encode_data_url};
use voxbridge_oss::BucketConnector;
use voxbridge_shared::constants::DEFAULT_PAGE_SIZE;
use voxbridge_shared::types::{FileId, Principal};

use crate::download::fetch_voice_content;
use crate::error::BridgeError;

/// One voice file as handed to the UI.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UiVoiceItem {
    pub id: FileId,
    /// Data URL ready for a playback element. Always playable; a file
    /// whose content could not be reconstructed carries the silent clip.
    pub base64_audio: String,
    pub created_at: DateTime<Utc>,
    pub title: Option<String>,
}

/// One page of voice items.
#[derive(Debug, Clone, Serialize)]
pub struct VoicePage {
    pub items: Vec<UiVoiceItem>,
    pub page: u32,
    pub has_more: bool,
}

/// Normalize a ledger epoch value into a UTC timestamp.
///
/// Ledgers in the wild report nanoseconds, microseconds, milliseconds or
/// seconds depending on backend version; the magnitude decides.
pub fn normalize_timestamp(raw: u64) -> DateTime<Utc> {
    let millis = if raw >= 100_000_000_000_000_000 {
        raw / 1_000_000 // nanoseconds
    } else if raw >= 100_000_000_000_000 {
        raw / 1_000 // microseconds
    } else if raw >= 100_000_000_000 {
        raw // milliseconds
    } else {
        raw.saturating_mul(1_000) // seconds
    };
    DateTime::from_timestamp_millis(millis as i64).unwrap_or_default()
}

/// Fetch one page of a user's voice files, with playable audio inlined.
pub async fn query_voice_page<L, C>(
    ledger: &L,
    connector: &C,
    principal: &Principal,
    page: u32,
    page_size: u32,
) -> Result<VoicePage, BridgeError>
where
    L: LedgerService,
    C: BucketConnector,
{
    let page = page.max(1);
    let page_size = if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    };

    let infos = match ledger
        .list_voice_files(Some(principal), None, page, page_size)
        .await
    {
        Ok(infos) => infos,
        Err(e) => {
            #[cfg(feature = "mock-data")]
            {
                warn!(error = %e, page, "Ledger listing failed, serving placeholder page");
                return Ok(placeholder_page(page, page_size));
            }
            #[cfg(not(feature = "mock-data"))]
            return Err(BridgeError::LedgerUnavailable(e));
        }
    };

    let has_more = infos.len() as u32 >= page_size;
    let mut items = Vec::with_capacity(infos.len());
    for info in infos {
        let bytes = match fetch_voice_content(ledger, connector, info.file_id, principal).await {
            Ok(bytes) => bytes,
            Err(e) => {
                // Item stays visible, just unplayable-as-silence.
                warn!(file = %info.file_id, error = %e, "Voice content unavailable for listing");
                empty_wav()
            }
        };
        items.push(UiVoiceItem {
            id: info.file_id,
            base64_audio: encode_data_url(&bytes),
            created_at: normalize_timestamp(info.created_at),
            title: info.metadata.title().map(str::to_string),
        });
    }

    Ok(VoicePage {
        items,
        page,
        has_more,
    })
}

/// Deterministic placeholder page served when the ledger is down.
///
/// Development convenience only; the ids are synthetic and the audio is
/// the silent clip. Production builds exclude this path entirely.
#[cfg(feature = "mock-data")]
fn placeholder_page(page: u32, page_size: u32) -> VoicePage {
    let silent = encode_data_url(&empty_wav());
    let items = (0..page_size)
        .map(|index| {
            let id = (page - 1) * page_size + index;
            UiVoiceItem {
                id: FileId(id),
                base64_audio: silent.clone(),
                created_at: Utc::now(),
                title: Some(format!("placeholder voice {id}")),
            }
        })
        .collect();
    VoicePage {
        items,
        page,
        has_more: true,
    }
}

/// Accumulates pages as the user scrolls, merging each new page onto the
/// already-loaded items.
#[derive(Debug, Clone)]
pub struct VoicePager {
    items: Vec<UiVoiceItem>,
    next_page: u32,
    page_size: u32,
    exhausted: bool,
}

impl VoicePager {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            next_page: 1,
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
            exhausted: false,
        }
    }

    pub fn items(&self) -> &[UiVoiceItem] {
        &self.items
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Load the next page and merge it in. Returns `true` while more
    /// pages may remain.
    pub async fn load_more<L, C>(
        &mut self,
        ledger: &L,
        connector: &C,
        principal: &Principal,
    ) -> Result<bool, BridgeError>
    where
        L: LedgerService,
        C: BucketConnector,
    {
        if self.exhausted {
            return Ok(false);
        }

        let page = query_voice_page(ledger, connector, principal, self.next_page, self.page_size)
            .await?;
        self.next_page += 1;
        self.exhausted = !page.has_more;
        for item in page.items {
            if self.items.iter().all(|existing| existing.id != item.id) {
                self.items.push(item);
            }
        }
        Ok(!self.exhausted)
    }
}
