#![allow(missing_docs)]

mod fake_backend;
mod form;
mod html;
mod http;

pub(crate) use fake_backend::{
    FakeBackend, TEST_ACCESS_TOKEN, TEST_PASSWORD, TEST_REFRESH_TOKEN, TEST_USERNAME,
    spawn_fake_backend, test_app_state, test_app_state_with_api,
};
pub(crate) use form::{
    assert_form_error_message, assert_form_input, assert_form_submit_button, assert_hx_endpoint,
    assert_optional_form_input, get_select_options, must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment, select_text};
pub(crate) use http::{assert_content_type, assert_hx_redirect, assert_location, get_header};
