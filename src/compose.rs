use crate::{LabelSize, PrintSettings, QrErrorLevel, Rotation, tspl::Command};

/// font used for every text line on the carton label
const LABEL_FONT: &str = "3";

/// positions of the carton label elements, all values in dots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelLayout {
    pub size: LabelSize,
    pub settings: PrintSettings,
    /// left edge of the header text lines
    pub header_x: u32,
    pub carton_id_y: u32,
    pub timestamp_y: u32,
    pub qr_x: u32,
    pub qr_y: u32,
    pub qr_cell_width: u8,
    pub separator_y: u32,
    pub separator_width: u32,
    pub separator_height: u32,
    /// position of the first record, the top left cell of the grid
    pub base_x: u32,
    pub base_y: u32,
    pub column_width: u32,
    pub row_height: u32,
    /// records per grid row
    pub columns: usize,
}

impl Default for LabelLayout {
    fn default() -> Self {
        LabelLayout {
            size: LabelSize::default(),
            settings: PrintSettings::default(),
            header_x: 50,
            carton_id_y: 30,
            timestamp_y: 100,
            qr_x: 650,
            qr_y: 20,
            qr_cell_width: 5,
            separator_y: 170,
            separator_width: 750,
            separator_height: 4,
            base_x: 50,
            base_y: 200,
            column_width: 380,
            row_height: 85,
            columns: 2,
        }
    }
}

impl LabelLayout {
    /// grid position `(x, y)` of the record at zero based `index`
    pub fn record_position(&self, index: usize) -> (u32, u32) {
        let columns = self.columns.max(1);
        let row = (index / columns) as u32;
        let column = (index % columns) as u32;
        (
            self.base_x + column * self.column_width,
            self.base_y + row * self.row_height,
        )
    }

    /// compose the command sequence for one carton label
    pub fn compose(&self, records: &[String], carton_id: &str, timestamp: &str) -> Vec<Command> {
        let mut commands = vec![
            Command::Clear,
            Command::Size(self.size),
            Command::Speed(self.settings.speed),
            Command::Density(self.settings.density),
            Command::Direction(self.settings.direction),
            Command::text(
                self.header_x,
                self.carton_id_y,
                LABEL_FONT,
                (1, 2),
                &format!("Carton ID: {}", carton_id),
            ),
            Command::text(
                self.header_x,
                self.timestamp_y,
                LABEL_FONT,
                (1, 2),
                &format!("Date Packed: {}", timestamp),
            ),
            Command::QrCode {
                x: self.qr_x,
                y: self.qr_y,
                error_level: QrErrorLevel::Medium,
                cell_width: self.qr_cell_width,
                rotation: Rotation::None,
                payload: carton_id.to_string(),
            },
            Command::Bar {
                x: self.header_x,
                y: self.separator_y,
                width: self.separator_width,
                height: self.separator_height,
            },
        ];
        commands.reserve(records.len() + 1);
        for (index, record) in records.iter().enumerate() {
            let (x, y) = self.record_position(index);
            commands.push(Command::text(
                x,
                y,
                LABEL_FONT,
                (1, 1),
                &numbered_entry(index, record),
            ));
        }
        commands.push(Command::Print { sets: 1, copies: 1 });
        commands
    }
}

/// the numbered line shown for a record, e.g. `01. HAA02-2544-336`
pub fn numbered_entry(index: usize, record: &str) -> String {
    format!("{:02}. {}", index + 1, record)
}

/// compose a carton label with the default layout
///
/// # Examples
///
/// ```
/// use tspl_carton_printer::compose::compose;
///
/// let records = vec!["HAA02-2544-336".to_string(), "HAA02-2544-337".to_string()];
/// let commands = compose(&records, "C2544-007", "2025-06-01 10:00:00");
/// assert_eq!(commands.first().map(|c| c.to_string()).as_deref(), Some("CLS"));
/// assert_eq!(commands.last().map(|c| c.to_string()).as_deref(), Some("PRINT 1,1"));
/// ```
pub fn compose(records: &[String], carton_id: &str, timestamp: &str) -> Vec<Command> {
    LabelLayout::default().compose(records, carton_id, timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("HAA02-2544-{:03}", i)).collect()
    }

    #[test]
    fn test_two_record_label() {
        let records = vec!["HAA02-2544-336".to_string(), "HAA02-2544-337".to_string()];
        let lines: Vec<String> = compose(&records, "C2544-007", "2025-06-01 10:00:00")
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(
            lines,
            vec![
                "CLS",
                "SIZE 100 mm, 150 mm, 2 mm",
                "SPEED 4",
                "DENSITY 8",
                "DIRECTION 0",
                "TEXT 50,30,\"3\",0,1,2,\"Carton ID: C2544-007\"",
                "TEXT 50,100,\"3\",0,1,2,\"Date Packed: 2025-06-01 10:00:00\"",
                "QRCODE 650,20,M,5,A,0,M2,S3,\"C2544-007\"",
                "BAR 50,170,750,4",
                "TEXT 50,200,\"3\",0,1,1,\"01. HAA02-2544-336\"",
                "TEXT 430,200,\"3\",0,1,1,\"02. HAA02-2544-337\"",
                "PRINT 1,1",
            ]
        );
        let prints = lines.iter().filter(|l| l.starts_with("PRINT")).count();
        assert_eq!(prints, 1);
    }

    #[test]
    fn test_grid_placement() {
        let layout = LabelLayout::default();
        let records = records(13);
        let commands = layout.compose(&records, "C2544-001", "2025-06-01 10:00:00");
        let placed: Vec<(u32, u32, String)> = commands
            .iter()
            .filter_map(|command| match command {
                Command::Text { x, y, content, .. } if *y >= layout.base_y => {
                    Some((*x, *y, content.clone()))
                }
                _ => None,
            })
            .collect();
        assert_eq!(placed.len(), records.len());
        for (i, (x, y, content)) in placed.iter().enumerate() {
            let column = (i % 2) as u32;
            let row = (i / 2) as u32;
            assert_eq!(*x, 50 + column * 380, "record {}", i);
            assert_eq!(*y, 200 + row * 85, "record {}", i);
            assert_eq!(*content, format!("{:02}. {}", i + 1, records[i]));
        }
    }

    #[test]
    fn test_custom_layout() {
        let layout = LabelLayout {
            base_x: 10,
            base_y: 300,
            column_width: 200,
            row_height: 40,
            columns: 3,
            ..LabelLayout::default()
        };
        assert_eq!(layout.record_position(0), (10, 300));
        assert_eq!(layout.record_position(2), (410, 300));
        assert_eq!(layout.record_position(3), (10, 340));
        assert_eq!(layout.record_position(7), (210, 380));
    }

    #[test]
    fn test_empty_records_still_prints_header() {
        let commands = compose(&[], "C2544-001", "2025-06-01 10:00:00");
        assert_eq!(commands.len(), 10);
        assert_eq!(commands.last(), Some(&Command::Print { sets: 1, copies: 1 }));
    }

    #[test]
    fn test_numbered_entry() {
        assert_eq!(numbered_entry(0, "A"), "01. A");
        assert_eq!(numbered_entry(9, "B"), "10. B");
        assert_eq!(numbered_entry(99, "C"), "100. C");
    }
}
