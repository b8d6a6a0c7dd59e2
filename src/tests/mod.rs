mod api_client_test;
