use alloy::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool success);

        function transfer(address to, uint256 amount) external returns (bool success);

        function balanceOf(address account) external view returns (uint256 balance);

        function decimals() external view returns (uint8 decimals);
    }
}
