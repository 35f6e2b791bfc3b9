mod content_type_detector_test;
mod docx_adapter_test;
mod image_adapter_test;
mod pdf_adapter_test;
