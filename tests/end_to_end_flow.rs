use std::sync::Arc;

use textCalendar::error::BackendError;
use textCalendar::service::extraction_service::EventExtractor;
use textCalendar::service::ics_service::{download_filename, event_window, generate_ics};
use textCalendar::service::openai_service::OpenAIClient;

struct FakeOpenAI {
    response: String,
}

#[async_trait::async_trait]
impl OpenAIClient for FakeOpenAI {
    async fn complete(
        &self,
        _system_message: &str,
        _user_message: &str,
        _api_key: &str,
    ) -> Result<String, BackendError> {
        Ok(self.response.clone())
    }
}

#[tokio::test]
async fn text_to_calendar_file() {
    let openai = Arc::new(FakeOpenAI {
        response: "Sure!\n```json\n{\"title\":\"Laboratory\",\"startDate\":\"2025-03-22\",\"startTime\":\"09:30\",\"location\":null,\"description\":null}\n```".to_string(),
    });
    let extractor = EventExtractor::new(openai, Some("sk-default".to_string()));

    let record = extractor
        .extract(
            Some("Remember you have one hour of Laboratory on Saturday March 22 2025 at 9:30"),
            None,
        )
        .await
        .unwrap();
    let ics = generate_ics(&record, "My Calendar").unwrap();

    assert!(ics.contains("SUMMARY:Laboratory"));
    assert!(ics.contains("DTSTART:20250322T093000"));
    assert!(ics.contains("DTEND:20250322T103000"));
    assert!(!ics.contains("LOCATION"));
    assert_eq!(download_filename(&record), "Laboratory.ics");
}

#[tokio::test]
async fn edited_record_is_serialized_as_edited() {
    let openai = Arc::new(FakeOpenAI {
        response: "{\"title\":\"Lab\",\"startDate\":\"2025-03-22\",\"startTime\":null}".to_string(),
    });
    let extractor = EventExtractor::new(openai, Some("sk-default".to_string()));

    let mut record = extractor.extract(Some("lab on saturday"), None).await.unwrap();
    record.start_time = Some("14:00".to_string());
    record.location = Some("Room 4".to_string());

    let (start, end) = event_window(&record).unwrap();
    assert_eq!(start.format("%Y-%m-%d %H:%M").to_string(), "2025-03-22 14:00");
    assert_eq!(end.format("%Y-%m-%d %H:%M").to_string(), "2025-03-22 15:00");

    let ics = generate_ics(&record, "My Calendar").unwrap();
    assert!(ics.contains("LOCATION:Room 4"));
}
