//! Resource ids and on-screen strings of the target app.
//!
//! These track one app build (see `DEFAULT_EXPECTED_VERSION`); expect breakage
//! on others.
use crate::types::Selector;

/// Builds selectors for ids inside the target package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    prefix: String,
}

impl Catalog {
    pub fn new(app_id: &str) -> Self {
        Self {
            prefix: format!("{app_id}:id/"),
        }
    }

    pub fn id(&self, name: &str) -> Selector {
        Selector::resource_id(format!("{}{}", self.prefix, name))
    }
}

pub mod ids {
    pub const TAB_ICON: &str = "tab_icon";
    pub const PROFILE_TAB: &str = "profile_tab";
    pub const NOTIFICATION_TAB: &str = "notification";
    pub const DIALOG_TITLE: &str = "default_dialog_title";
    pub const LOGIN_USERNAME: &str = "login_username";
    pub const ACTION_BAR_TITLE: &str = "action_bar_textview_title";
    pub const ACTION_BAR_NEW_TITLE: &str = "action_bar_new_title_container";

    pub const FOLLOWERS_COUNT: &str = "row_profile_header_textview_followers_count";
    pub const FOLLOWING_COUNT: &str = "row_profile_header_textview_following_count";
    pub const FOLLOWERS_CONTAINER: &str = "row_profile_header_followers_container";
    pub const FOLLOWING_CONTAINER: &str = "row_profile_header_following_container";
    pub const PROFILE_HEADER_STUB: &str = "profile_header_avatar_container_top_left_stub";
    pub const PROFILE_VIEWPAGER: &str = "profile_viewpager";
    pub const MEDIA_GRID_ROW: &str = "media_set_row_content_identifier";

    pub const FOLLOW_LIST_USERNAME: &str = "follow_list_username";
    pub const FOLLOW_LIST_CONTAINER: &str = "follow_list_container";
    pub const FOLLOW_LIST_AVATAR: &str = "follow_list_user_imageview";
    pub const FOLLOW_BUTTON: &str = "follow_button";
    pub const SORT_ICON: &str = "sorting_entry_row_icon";
    pub const SORT_OPTION_ROW: &str = "sorting_entry_row_option";
    pub const SORT_RADIO: &str = "follow_list_sorting_option_radio_button";
    pub const SEARCH_FIELD: &str = "row_search_edit_text";
    pub const ROW_HEADER: &str = "row_header_textview";
    pub const HASHTAG_ROW_IMAGE: &str = "row_hashtag_image";
    pub const LIST_TITLE: &str = "title";
    pub const BUTTON: &str = "button";

    pub const NOTIFICATION_ROW_TEXT: &str = "row_text";

    pub const FEED_CONTAINER: &str = "refreshable_container";
    pub const FEED_LIKE_BUTTON: &str = "row_feed_button_like";
    pub const FEED_SAVE_BUTTON: &str = "row_feed_button_save";
    pub const FEED_SECONDARY_LABEL: &str = "secondary_label";
    pub const FEED_AUTHOR: &str = "row_feed_photo_profile_name";
    pub const FEED_PHOTO: &str = "row_feed_photo_imageview";
    pub const CAROUSEL: &str = "carousel_media_group";
    pub const LOAD_MORE: &str = "row_load_more_button";
    pub const CAMERA_TOP_CONTROLS: &str = "pre_capture_buttons_top_container";

    pub const HASHTAG_MEDIA_COUNT: &str = "hashtag_media_count";
    pub const FIRST_GRID_IMAGE: &str = "image_button";

    pub const SETTINGS_ROW: &str = "menu_settings_row";
    pub const SETTINGS_TEXT_ROW: &str = "row_simple_text_textview";

    pub const COLLECTION_NAME: &str = "collection_name";
    pub const COLLECTION_THUMB: &str = "selectable_image";
    pub const NEW_COLLECTION: &str = "save_to_collection_new_collection_button";
    pub const NEW_COLLECTION_NAME: &str = "create_collection_edit_text";
    pub const SAVE_TO_COLLECTION: &str = "save_to_collection_action_button";

    pub const SESSION_DEVICE: &str = "body_message_device";
    pub const SESSION_TITLE: &str = "title_message";

    /// System list container, not namespaced by the app package.
    pub const SYSTEM_LIST: &str = "android:id/list";
}

pub mod texts {
    pub const SUGGESTIONS_FOR_YOU: &str = "Suggestions for you";
    pub const SUGGESTIONS: &str = "Suggestions";
    pub const LOGGED_OUT: &str = "You've Been Logged Out";
    pub const LEAST_INTERACTED: &str = "Least Interacted With";
    pub const HASHTAGS_TITLE: &str = "Hashtags";
    pub const FOLLOW: &str = "Follow";
    pub const FOLLOWING: &str = "Following";
    pub const LIKE: &str = "Like";
    pub const SPONSORED: &str = "Sponsored";
    pub const RETRY: &str = "Retry";
    pub const OPTIONS: &str = "Options";
    pub const ACCOUNT: &str = "Account";
    pub const LIKED_POSTS: &str = "Posts You've Liked";
    pub const SECURITY: &str = "Security";
    pub const LOGIN_ACTIVITY: &str = "Login Activity";
    pub const LOG_OUT: &str = "Log Out";
    pub const OKAY: &str = "Okay";
    pub const VIDEO_PREFIX: &str = "Video by ";
}

pub mod classes {
    pub const IMAGE_VIEW: &str = "android.widget.ImageView";
    pub const FRAME_LAYOUT: &str = "android.widget.FrameLayout";
    pub const LINEAR_LAYOUT: &str = "android.widget.LinearLayout";
}
