use embedded_storage::{ReadStorage, Storage};
use esp_storage::FlashStorage;
use notnot_core::{PersistedHighScore, HIGH_SCORE_RECORD_LEN};

/// High-score record in the last flash sector.
pub(crate) struct HighScoreStore<'d> {
    flash: FlashStorage<'d>,
    offset: u32,
}

impl<'d> HighScoreStore<'d> {
    pub(crate) fn new(flash_peripheral: esp_hal::peripherals::FLASH<'d>) -> Self {
        let flash = FlashStorage::new(flash_peripheral).multicore_auto_park();
        let capacity = flash.capacity() as u32;
        let offset = capacity.saturating_sub(FlashStorage::SECTOR_SIZE);
        Self { flash, offset }
    }

    pub(crate) fn load(&mut self) -> Option<PersistedHighScore> {
        let mut record = [0u8; HIGH_SCORE_RECORD_LEN];
        self.flash.read(self.offset, &mut record).ok()?;
        PersistedHighScore::from_record(&record)
    }

    pub(crate) fn save(&mut self, persisted: PersistedHighScore) -> bool {
        if self.load() == Some(persisted) {
            return true;
        }
        self.flash
            .write(self.offset, &persisted.record_bytes())
            .is_ok()
    }
}
